//! # stratus-core
//!
//! The component contract and everything a component needs to be built:
//! - **Spec**: the declarative manifest model (components, binds, triggers).
//! - **Context**: the service-wide environment shared by one synthesis run.
//! - **Construct**: typed handles to synthesized resources.
//! - **Component**: the capability-set contract every component satisfies.
//! - **Config**: the five-layer configuration precedence engine.
//! - **Governance**: layered resolution of governance metadata.
//! - **Registry**: type key to creator mapping.
//! - **Validator**: static checks on component specs before synthesis.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod component;
pub mod config;
pub mod construct;
pub mod context;
pub mod governance;
pub mod registry;
pub mod spec;
pub mod validator;
