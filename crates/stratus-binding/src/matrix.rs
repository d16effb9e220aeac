//! The Binder Matrix: strategy dispatch keyed by source type.
//!
//! Each registered strategy is indexed under every source type its
//! compatibility matrix names. A lookup only scans the strategies of one
//! source type, in registration order; the first whose `can_handle`
//! accepts wins.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use stratus_common::types::{AccessLevel, TriggerAccess};

use crate::compat::{CompatibilityEntry, TriggerCompatibilityEntry};
use crate::strategy::{BindingStrategy, TriggerStrategy};
use crate::{strategies, triggers};

/// Aggregated compatibility surface of every registered strategy.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    /// Binding entries, in registration order.
    pub bindings: Vec<CompatibilityEntry>,
    /// Trigger entries, in registration order.
    pub triggers: Vec<TriggerCompatibilityEntry>,
}

/// Strategy registry with per-source-type indexes.
#[derive(Default)]
pub struct BinderMatrix {
    binding_strategies: Vec<Box<dyn BindingStrategy>>,
    trigger_strategies: Vec<Box<dyn TriggerStrategy>>,
    binding_index: HashMap<String, Vec<usize>>,
    trigger_index: HashMap<String, Vec<usize>>,
}

impl BinderMatrix {
    /// Creates an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matrix holding every built-in strategy.
    #[must_use]
    pub fn with_default_strategies() -> Self {
        let mut matrix = Self::new();
        for strategy in strategies::builtin() {
            matrix.register_binding_strategy(strategy);
        }
        for strategy in triggers::builtin() {
            matrix.register_trigger_strategy(strategy);
        }
        tracing::debug!(
            bindings = matrix.binding_strategies.len(),
            triggers = matrix.trigger_strategies.len(),
            "binder matrix initialized"
        );
        matrix
    }

    /// Adds a binding strategy after every previously registered one.
    pub fn register_binding_strategy(&mut self, strategy: Box<dyn BindingStrategy>) {
        let position = self.binding_strategies.len();
        let source_types = strategy
            .compatibility_matrix()
            .into_iter()
            .map(|entry| entry.source_type);
        if !index(&mut self.binding_index, position, source_types) {
            tracing::warn!(
                strategy = strategy.name(),
                "binding strategy has an empty compatibility matrix; it will never be selected"
            );
        }
        self.binding_strategies.push(strategy);
    }

    /// Adds a trigger strategy after every previously registered one.
    pub fn register_trigger_strategy(&mut self, strategy: Box<dyn TriggerStrategy>) {
        let position = self.trigger_strategies.len();
        let source_types = strategy
            .compatibility_matrix()
            .into_iter()
            .map(|entry| entry.source_type);
        if !index(&mut self.trigger_index, position, source_types) {
            tracing::warn!(
                strategy = strategy.name(),
                "trigger strategy has an empty compatibility matrix; it will never be selected"
            );
        }
        self.trigger_strategies.push(strategy);
    }

    /// Returns the first strategy able to bind `source_type` to `capability`.
    #[must_use]
    pub fn find_binding_strategy(&self, source_type: &str, capability: &str) -> Option<&dyn BindingStrategy> {
        self.binding_index
            .get(source_type)?
            .iter()
            .map(|&i| self.binding_strategies[i].as_ref())
            .find(|strategy| strategy.can_handle(source_type, capability))
    }

    /// Returns the first strategy able to wire `event_type` from
    /// `source_type` to `target_type`.
    #[must_use]
    pub fn find_trigger_strategy(
        &self,
        source_type: &str,
        target_type: &str,
        event_type: &str,
    ) -> Option<&dyn TriggerStrategy> {
        self.trigger_index
            .get(source_type)?
            .iter()
            .map(|&i| self.trigger_strategies[i].as_ref())
            .find(|strategy| strategy.can_handle(source_type, target_type, event_type))
    }

    /// Every compatibility entry of every strategy.
    #[must_use]
    pub fn full_compatibility_matrix(&self) -> CompatibilityReport {
        CompatibilityReport {
            bindings: self
                .binding_strategies
                .iter()
                .flat_map(|s| s.compatibility_matrix())
                .collect(),
            triggers: self
                .trigger_strategies
                .iter()
                .flat_map(|s| s.compatibility_matrix())
                .collect(),
        }
    }

    /// Binding entries whose source is `source_type`.
    #[must_use]
    pub fn supported_bindings(&self, source_type: &str) -> Vec<CompatibilityEntry> {
        self.binding_index
            .get(source_type)
            .into_iter()
            .flatten()
            .flat_map(|&i| self.binding_strategies[i].compatibility_matrix())
            .filter(|entry| entry.source_type == source_type)
            .collect()
    }

    /// Trigger entries whose source is `source_type`.
    #[must_use]
    pub fn supported_triggers(&self, source_type: &str) -> Vec<TriggerCompatibilityEntry> {
        self.trigger_index
            .get(source_type)
            .into_iter()
            .flatten()
            .flat_map(|&i| self.trigger_strategies[i].compatibility_matrix())
            .filter(|entry| entry.source_type == source_type)
            .collect()
    }

    /// Whether some strategy advertises this exact binding.
    #[must_use]
    pub fn is_binding_supported(
        &self,
        source_type: &str,
        target_type: &str,
        capability: &str,
        access: AccessLevel,
    ) -> bool {
        self.supported_bindings(source_type).iter().any(|entry| {
            entry.target_type == target_type && entry.capability == capability && entry.supports(access)
        })
    }

    /// Whether some strategy advertises this exact trigger.
    #[must_use]
    pub fn is_trigger_supported(
        &self,
        source_type: &str,
        target_type: &str,
        event_type: &str,
        access: TriggerAccess,
    ) -> bool {
        self.supported_triggers(source_type).iter().any(|entry| {
            entry.target_type == target_type && entry.event_type == event_type && entry.supports(access)
        })
    }

    /// Bindings available from `source_type` to `target_type`.
    #[must_use]
    pub fn binding_recommendations(&self, source_type: &str, target_type: &str) -> Vec<CompatibilityEntry> {
        self.supported_bindings(source_type)
            .into_iter()
            .filter(|entry| entry.target_type == target_type)
            .collect()
    }

    /// Names of the registered binding strategies, in registration order.
    #[must_use]
    pub fn binding_strategy_names(&self) -> Vec<&str> {
        self.binding_strategies.iter().map(|s| s.name()).collect()
    }

    /// Names of the registered trigger strategies, in registration order.
    #[must_use]
    pub fn trigger_strategy_names(&self) -> Vec<&str> {
        self.trigger_strategies.iter().map(|s| s.name()).collect()
    }
}

impl fmt::Debug for BinderMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinderMatrix")
            .field("binding_strategies", &self.binding_strategy_names())
            .field("trigger_strategies", &self.trigger_strategy_names())
            .finish_non_exhaustive()
    }
}

/// Records `position` under each distinct source type. Returns whether any
/// source type was indexed.
fn index(
    buckets: &mut HashMap<String, Vec<usize>>,
    position: usize,
    source_types: impl Iterator<Item = String>,
) -> bool {
    let mut indexed = false;
    for source_type in source_types {
        let bucket = buckets.entry(source_type).or_default();
        if bucket.last() != Some(&position) {
            bucket.push(position);
        }
        indexed = true;
    }
    indexed
}
