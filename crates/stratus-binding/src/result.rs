//! Outcomes of applying one binding or trigger.

use std::collections::BTreeMap;
use std::error::Error as _;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use stratus_common::error::StratusError;

/// Structured description of a recovered strategy failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingErrorDetail {
    /// Top-level error message.
    pub message: String,
    /// Messages of the error and every underlying cause, outermost first.
    pub stack: Vec<String>,
    /// Error variant name.
    pub error_kind: String,
    /// Type of the source component.
    pub source_type: String,
    /// Type of the target component.
    pub target_type: String,
    /// When the failure was captured.
    pub timestamp: DateTime<Utc>,
}

impl BindingErrorDetail {
    /// Captures `err` raised while wiring `source_type` to `target_type`.
    #[must_use]
    pub fn capture(err: &StratusError, source_type: &str, target_type: &str) -> Self {
        let mut stack = vec![err.to_string()];
        let mut cause = err.source();
        while let Some(inner) = cause {
            stack.push(inner.to_string());
            cause = inner.source();
        }
        Self {
            message: err.to_string(),
            stack,
            error_kind: err.kind().to_string(),
            source_type: source_type.to_string(),
            target_type: target_type.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Success flag, producing strategy and failure detail of an outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingMetadata {
    /// Whether the strategy completed.
    pub success: bool,
    /// Strategy that produced the outcome.
    pub strategy: String,
    /// Failure detail, present when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BindingErrorDetail>,
}

/// Output of one binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingResult {
    /// Variables injected into the source component's runtime.
    pub environment_variables: BTreeMap<String, String>,
    /// Outcome metadata.
    pub metadata: BindingMetadata,
}

impl BindingResult {
    /// A completed binding.
    #[must_use]
    pub fn success(strategy: &str, environment_variables: BTreeMap<String, String>) -> Self {
        Self {
            environment_variables,
            metadata: BindingMetadata {
                success: true,
                strategy: strategy.to_string(),
                error: None,
            },
        }
    }

    /// A recovered failure; carries no environment variables.
    #[must_use]
    pub fn failure(strategy: &str, detail: BindingErrorDetail) -> Self {
        Self {
            environment_variables: BTreeMap::new(),
            metadata: BindingMetadata {
                success: false,
                strategy: strategy.to_string(),
                error: Some(detail),
            },
        }
    }

    /// Returns whether the binding completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.metadata.success
    }
}

/// Event wiring produced by a trigger strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfiguration {
    /// Event name from the directive.
    pub event_type: String,
    /// ARN of the emitting resource.
    pub event_source_arn: String,
    /// ARN of the consuming resource.
    pub target_arn: String,
    /// Provider-level event names the wiring subscribes to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
    /// Event filter or pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    /// Input transformation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<Value>,
    /// Records per invocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u64>,
    /// Maximum batching window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batching_window_seconds: Option<u64>,
    /// Destination for events that could not be delivered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_arn: Option<String>,
}

impl TriggerConfiguration {
    /// Creates a configuration with no filter, transform or batching.
    #[must_use]
    pub fn new(
        event_type: impl Into<String>,
        event_source_arn: impl Into<String>,
        target_arn: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            event_source_arn: event_source_arn.into(),
            target_arn: target_arn.into(),
            events: Vec::new(),
            filter: None,
            transform: None,
            batch_size: None,
            max_batching_window_seconds: None,
            dead_letter_arn: None,
        }
    }
}

/// Output of one trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResult {
    /// Event wiring, absent on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<TriggerConfiguration>,
    /// Outcome metadata.
    pub metadata: BindingMetadata,
}

impl TriggerResult {
    /// A completed trigger.
    #[must_use]
    pub fn success(strategy: &str, configuration: TriggerConfiguration) -> Self {
        Self {
            configuration: Some(configuration),
            metadata: BindingMetadata {
                success: true,
                strategy: strategy.to_string(),
                error: None,
            },
        }
    }

    /// A recovered failure.
    #[must_use]
    pub fn failure(strategy: &str, detail: BindingErrorDetail) -> Self {
        Self {
            configuration: None,
            metadata: BindingMetadata {
                success: false,
                strategy: strategy.to_string(),
                error: Some(detail),
            },
        }
    }

    /// Returns whether the trigger completed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.metadata.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_has_empty_environment_and_detail() {
        let err = StratusError::binding("queue has no encryption key");
        let detail = BindingErrorDetail::capture(&err, "lambda-api", "sqs-queue");
        let result = BindingResult::failure("compute-to-sqs", detail);

        assert!(!result.is_success());
        assert!(result.environment_variables.is_empty());
        let error = result.metadata.error.as_ref().expect("detail");
        assert_eq!(error.error_kind, "Binding");
        assert_eq!(error.source_type, "lambda-api");
        assert_eq!(error.target_type, "sqs-queue");
        assert_eq!(error.stack.first(), Some(&error.message));
    }

    #[test]
    fn stack_walks_error_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = StratusError::Io {
            path: "config/commercial.yml".into(),
            source: io,
        };
        let detail = BindingErrorDetail::capture(&err, "a", "b");
        assert_eq!(detail.stack.len(), 2);
        assert_eq!(detail.stack[1], "gone");
    }

    #[test]
    fn success_serializes_without_error() {
        let result = BindingResult::success(
            "compute-to-sns",
            BTreeMap::from([("TOPIC_ARN".to_string(), "arn".to_string())]),
        );
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["environmentVariables"]["TOPIC_ARN"], "arn");
        assert_eq!(json["metadata"]["success"], true);
        assert!(json["metadata"].get("error").is_none());
    }
}
