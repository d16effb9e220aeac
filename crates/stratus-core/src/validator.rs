//! Static validation of component specs before synthesis.
//!
//! Checks for duplicate names, malformed directives, and direct
//! references to components that do not exist.

use std::collections::HashSet;

use stratus_common::error::{Result, StratusError};

use crate::spec::{ComponentSpec, TargetSelector};

/// Validates component specs for semantic correctness.
///
/// # Checks performed
///
/// 1. Every component has a non-empty name and type.
/// 2. No duplicate component names.
/// 3. Every bind and trigger has exactly one target selector.
/// 4. Every bind names a capability; every trigger names an event type.
/// 5. Every `to:` reference names a defined component.
///
/// # Errors
///
/// Returns an error if any check fails.
pub fn validate_components(components: &[ComponentSpec]) -> Result<()> {
    tracing::debug!(count = components.len(), "validating component specs");
    check_identity(components)?;
    check_duplicate_names(components)?;
    check_directives(components)?;
    Ok(())
}

fn check_identity(components: &[ComponentSpec]) -> Result<()> {
    for (index, comp) in components.iter().enumerate() {
        if comp.name.trim().is_empty() {
            return Err(StratusError::Config {
                message: format!("component at position {index} has an empty name"),
            });
        }
        if comp.component_type.trim().is_empty() {
            return Err(StratusError::Config {
                message: format!("component \"{}\" has an empty type", comp.name),
            });
        }
    }
    Ok(())
}

fn check_duplicate_names(components: &[ComponentSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for comp in components {
        if !seen.insert(comp.name.as_str()) {
            return Err(StratusError::Config {
                message: format!("duplicate component name: \"{}\"", comp.name),
            });
        }
    }
    Ok(())
}

fn check_directives(components: &[ComponentSpec]) -> Result<()> {
    let names: HashSet<&str> = components.iter().map(|c| c.name.as_str()).collect();
    let check_named = |component: &str, selector: TargetSelector<'_>| -> Result<()> {
        match selector {
            TargetSelector::Named(target) if !names.contains(target) => Err(StratusError::Selector {
                component: component.to_string(),
                message: format!("target \"{target}\" is not defined"),
            }),
            _ => Ok(()),
        }
    };

    for comp in components {
        for bind in &comp.binds {
            if bind.capability.trim().is_empty() {
                return Err(StratusError::InvalidDirective {
                    component: comp.name.clone(),
                    message: "bind has an empty capability".into(),
                });
            }
            check_named(&comp.name, bind.target(&comp.name)?)?;
        }
        for trigger in &comp.triggers {
            if trigger.event_type.trim().is_empty() {
                return Err(StratusError::InvalidDirective {
                    component: comp.name.clone(),
                    message: "trigger has an empty event type".into(),
                });
            }
            check_named(&comp.name, trigger.target(&comp.name)?)?;
        }
    }
    Ok(())
}
