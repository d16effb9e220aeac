//! # stratus-resolver
//!
//! The synthesis pipeline. [`engine::ResolverEngine`] runs five phases in
//! sequence over a service's component specs:
//!
//! 1. **Instantiation** through the tier's component registry.
//! 2. **Synthesis** of every component's constructs and capabilities.
//! 3. **Binding** of every `binds` and `triggers` directive through the
//!    Binder Matrix.
//! 4. **Patching** by optional escape-hatch modules.
//! 5. **Reporting** as a serializable [`result::SynthesisResult`].

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod engine;
pub mod patches;
pub mod result;
pub mod selector;
