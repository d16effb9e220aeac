//! Component type to creator mapping.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use stratus_common::error::{Result, StratusError};

use crate::component::Component;
use crate::context::ComponentContext;
use crate::spec::ComponentSpec;

/// Function constructing a component from its spec.
pub type ComponentCreator =
    Box<dyn Fn(&ComponentSpec, &Arc<ComponentContext>) -> Result<Box<dyn Component>>>;

/// Registry of component creators keyed by type.
#[derive(Default)]
pub struct ComponentRegistry {
    creators: BTreeMap<String, ComponentCreator>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `component_type` with `creator`. A later registration for
    /// the same type replaces the earlier one.
    pub fn register<F>(&mut self, component_type: impl Into<String>, creator: F)
    where
        F: Fn(&ComponentSpec, &Arc<ComponentContext>) -> Result<Box<dyn Component>> + 'static,
    {
        let component_type = component_type.into();
        if self
            .creators
            .insert(component_type.clone(), Box::new(creator))
            .is_some()
        {
            tracing::debug!(%component_type, "replacing registered component creator");
        }
    }

    /// Instantiates the component described by `spec`.
    ///
    /// # Errors
    ///
    /// Returns an error listing every registered type if none matches
    /// `spec.component_type`, or the creator's own error.
    pub fn create_component(
        &self,
        spec: &ComponentSpec,
        context: &Arc<ComponentContext>,
    ) -> Result<Box<dyn Component>> {
        let creator = self.creators.get(&spec.component_type).ok_or_else(|| {
            StratusError::UnknownComponentType {
                component_type: spec.component_type.clone(),
                component: spec.name.clone(),
                available: self.supported_types(),
            }
        })?;
        tracing::debug!(component = %spec.name, component_type = %spec.component_type, "creating component");
        creator(spec, context)
    }

    /// Returns every registered type, sorted.
    #[must_use]
    pub fn supported_types(&self) -> Vec<String> {
        self.creators.keys().cloned().collect()
    }

    /// Returns whether `component_type` has a creator.
    #[must_use]
    pub fn contains(&self, component_type: &str) -> bool {
        self.creators.contains_key(component_type)
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("types", &self.supported_types())
            .finish()
    }
}
