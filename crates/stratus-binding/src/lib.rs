//! # stratus-binding
//!
//! Wiring between synthesized components.
//!
//! - [`strategy::BindingStrategy`] wires a compute component to a resource
//!   capability: grants, hardening, options, environment variables.
//! - [`strategy::TriggerStrategy`] wires a resource event to a consumer.
//! - [`matrix::BinderMatrix`] indexes both kinds of strategy by source type
//!   and answers lookups and compatibility queries.
//! - [`hardening`] layers compliance-tier conditions onto every grant.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod access;
pub mod compat;
pub mod context;
pub mod hardening;
pub mod matrix;
pub mod result;
pub mod strategies;
pub mod strategy;
pub mod triggers;

#[cfg(test)]
pub(crate) mod testing;
