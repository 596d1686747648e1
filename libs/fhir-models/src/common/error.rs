//! Error types for FHIR models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Expected a JSON object for {0}")]
    ExpectedObject(&'static str),

    #[error("Missing resourceType property (expected {0})")]
    MissingResourceType(&'static str),

    #[error("resourceType mismatch: expected {expected}, found {found}")]
    ResourceTypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Unsupported resource type: {0}")]
    UnknownResourceType(String),

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Rejection reported by a [`ModelValidator`](crate::builder::ModelValidator).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{type_name} failed validation: {}", .messages.join("; "))]
pub struct ValidationFailure {
    pub type_name: String,
    pub messages: Vec<String>,
}

impl ValidationFailure {
    pub fn new(type_name: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            messages,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_lists_every_message() {
        let failure = ValidationFailure::new(
            "Observation",
            vec!["status is required".into(), "code is required".into()],
        );
        assert_eq!(
            failure.to_string(),
            "Observation failed validation: status is required; code is required"
        );

        let err = Error::from(failure);
        assert!(err.to_string().starts_with("Observation failed validation"));
    }
}
