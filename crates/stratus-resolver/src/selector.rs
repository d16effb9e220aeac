//! Directive target resolution.

use stratus_common::error::{Result, StratusError};
use stratus_core::component::Component;
use stratus_core::spec::{SelectorSpec, TargetSelector};

/// Resolves the single component a directive of `declaring` points at.
///
/// # Errors
///
/// Returns a selector error if a name is undefined, or if a type and label
/// selector matches no component or more than one.
pub fn resolve<'a>(
    components: &'a [Box<dyn Component>],
    declaring: &str,
    selector: TargetSelector<'_>,
) -> Result<&'a dyn Component> {
    match selector {
        TargetSelector::Named(name) => components
            .iter()
            .find(|c| c.name() == name)
            .map(|c| &**c)
            .ok_or_else(|| StratusError::Selector {
                component: declaring.to_string(),
                message: format!("target \"{name}\" is not defined"),
            }),
        TargetSelector::Select(spec) => {
            let candidates: Vec<&dyn Component> = components
                .iter()
                .map(|c| &**c)
                .filter(|c| matches(*c, spec))
                .collect();
            match candidates.as_slice() {
                [single] => Ok(*single),
                [] => Err(StratusError::Selector {
                    component: declaring.to_string(),
                    message: format!("{selector} matched no component"),
                }),
                many => Err(StratusError::Selector {
                    component: declaring.to_string(),
                    message: format!(
                        "{selector} matched {} components ({}); add labels to narrow it to one",
                        many.len(),
                        many.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
                    ),
                }),
            }
        }
    }
}

fn matches(component: &dyn Component, selector: &SelectorSpec) -> bool {
    let labels = &component.spec().labels;
    component.component_type() == selector.component_type
        && selector
            .labels
            .iter()
            .all(|(key, value)| labels.get(key) == Some(value))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use stratus_common::types::ComplianceFramework;
    use stratus_core::component::SynthesisState;
    use stratus_core::context::ComponentContext;
    use stratus_core::spec::ComponentSpec;

    use super::*;

    struct Stub {
        spec: ComponentSpec,
        context: ComponentContext,
        state: SynthesisState,
    }

    impl Component for Stub {
        fn spec(&self) -> &ComponentSpec {
            &self.spec
        }

        fn context(&self) -> &ComponentContext {
            &self.context
        }

        fn state(&self) -> &SynthesisState {
            &self.state
        }

        fn synth(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn stub(name: &str, component_type: &str, labels: &[(&str, &str)]) -> Box<dyn Component> {
        let mut spec = ComponentSpec::new(name, component_type);
        spec.labels = labels
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Box::new(Stub {
            spec,
            context: ComponentContext::new("svc", "dev", ComplianceFramework::Commercial),
            state: SynthesisState::new(),
        })
    }

    fn components() -> Vec<Box<dyn Component>> {
        vec![
            stub("ingest", "lambda-worker", &[("role", "consumer"), ("team", "a")]),
            stub("report", "lambda-worker", &[("role", "batch"), ("team", "a")]),
            stub("jobs", "sqs-queue", &[]),
        ]
    }

    fn select(component_type: &str, labels: &[(&str, &str)]) -> SelectorSpec {
        SelectorSpec {
            component_type: component_type.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn named_target_resolves() {
        let all = components();
        let found = resolve(&all, "api", TargetSelector::Named("jobs")).expect("resolve");
        assert_eq!(found.component_type(), "sqs-queue");
    }

    #[test]
    fn undefined_name_is_fatal() {
        let all = components();
        let err = resolve(&all, "api", TargetSelector::Named("nope")).err().expect("error");
        assert_eq!(err.kind(), "Selector");
        assert!(err.to_string().contains("\"nope\""));
    }

    #[test]
    fn labels_narrow_to_one() {
        let all = components();
        let spec = select("lambda-worker", &[("role", "consumer")]);
        let found = resolve(&all, "jobs", TargetSelector::Select(&spec)).expect("resolve");
        assert_eq!(found.name(), "ingest");
    }

    #[test]
    fn ambiguous_selector_lists_candidates() {
        let all = components();
        let spec = select("lambda-worker", &[("team", "a")]);
        let err = resolve(&all, "jobs", TargetSelector::Select(&spec)).err().expect("error");
        let msg = err.to_string();
        assert!(msg.contains("matched 2 components"), "got: {msg}");
        assert!(msg.contains("ingest, report"), "got: {msg}");
    }

    #[test]
    fn empty_selector_match_is_fatal() {
        let all = components();
        let spec = select("lambda-worker", &[("role", "missing")]);
        let err = resolve(&all, "jobs", TargetSelector::Select(&spec)).err().expect("error");
        assert!(err.to_string().contains("matched no component"));
    }
}
