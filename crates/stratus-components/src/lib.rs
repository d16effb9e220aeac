//! # stratus-components
//!
//! The built-in component catalog and the compliance-aware factories that
//! expose it.
//!
//! - [`factory::ComponentFactoryProvider`] maps a compliance tier to a
//!   factory through a tier-keyed table.
//! - Each factory produces a [`stratus_core::registry::ComponentRegistry`]
//!   restricted to the component types legal under its tier.
//! - The component modules implement [`stratus_core::component::Component`]
//!   for each built-in type.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod base;
pub mod bucket;
pub mod catalog;
pub mod database;
pub mod factory;
pub mod function;
pub mod queue;
pub mod table;
pub mod topic;

#[cfg(test)]
pub(crate) mod testing;
