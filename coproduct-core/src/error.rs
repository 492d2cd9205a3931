// Error types for coproduct

use std::error::Error;
use std::fmt;

use crate::data::Tagged;

/// Why a dispatch call could not select a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// `case` found neither an exact handler nor a fallback
    UnexpectedInput,
    /// `partial` found neither an exact handler nor a fallback
    UnhandledBranch,
    /// A payload handler was selected for a value without a payload
    MissingPayload,
}

/// Raised when no handler can be selected for a value.
///
/// The offending value is handed back so the caller keeps ownership of it.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchFailure<P = serde_json::Value> {
    reason: FailureReason,
    value: Tagged<P>,
}

impl<P> DispatchFailure<P> {
    pub(crate) fn new(reason: FailureReason, value: Tagged<P>) -> Self {
        DispatchFailure { reason, value }
    }

    pub fn reason(&self) -> FailureReason {
        self.reason
    }

    /// The label no handler was found for
    pub fn tag(&self) -> &str {
        self.value.tag()
    }

    pub fn value(&self) -> &Tagged<P> {
        &self.value
    }

    pub fn into_value(self) -> Tagged<P> {
        self.value
    }
}

/// Tag schema validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Discriminant field name must not be empty")]
    EmptyDiscriminant,
    #[error("Variant label must not be empty (position {0})")]
    EmptyLabel(usize),
    #[error("Variant label '_' is reserved for the fallback handler")]
    ReservedLabel,
    #[error("Duplicate variant label: {0}")]
    DuplicateLabel(String),
    #[error("Payload field '{0}' collides with the discriminant field")]
    PayloadFieldCollision(String),
}

/// Errors moving between JSON records and tagged values
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Expected a JSON object, but was: {0}")]
    NotAnObject(serde_json::Value),
    #[error("Missing discriminant field: {0}")]
    MissingDiscriminant(String),
    #[error("Discriminant field '{field}' must hold a string, but was: {actual}")]
    DiscriminantNotString {
        field: String,
        actual: serde_json::Value,
    },
    #[error("Discriminant field '{0}' holds an empty label")]
    EmptyLabel(String),
    #[error("Payload field '{0}' collides with the discriminant field")]
    PayloadFieldCollision(String),
    #[error("Payload conversion failed: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Dispatch failed: {0}")]
    Dispatch(DispatchFailure<serde_json::Value>),
}

/// Umbrella error for hosts that mix schema, record and dispatch operations
#[derive(Debug, thiserror::Error)]
pub enum CoproductError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Record error: {0}")]
    Record(#[from] RecordError),
    #[error("{message}")]
    Dispatch { tag: String, message: String },
}

impl<P> From<DispatchFailure<P>> for CoproductError {
    fn from(failure: DispatchFailure<P>) -> Self {
        CoproductError::Dispatch {
            tag: failure.tag().to_string(),
            message: failure.to_string(),
        }
    }
}

impl From<DispatchFailure<serde_json::Value>> for RecordError {
    fn from(failure: DispatchFailure<serde_json::Value>) -> Self {
        RecordError::Dispatch(failure)
    }
}

// Display implementations

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::UnexpectedInput => write!(f, "Unexpected input"),
            FailureReason::UnhandledBranch => write!(f, "Unhandled branch"),
            FailureReason::MissingPayload => write!(f, "Missing payload for branch"),
        }
    }
}

impl<P> fmt::Display for DispatchFailure<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.value.tag())
    }
}

impl<P: fmt::Debug> Error for DispatchFailure<P> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{tag_only, tag_with_payload};

    #[test]
    fn display_names_reason_and_label() {
        let failure = DispatchFailure::new(FailureReason::UnexpectedInput, tag_only::<()>("zap"));
        assert_eq!(failure.to_string(), "Unexpected input: zap");

        let failure = DispatchFailure::new(FailureReason::UnhandledBranch, tag_with_payload("b")(1));
        assert_eq!(failure.to_string(), "Unhandled branch: b");
        assert_eq!(failure.into_value().into_payload(), Some(1));
    }

    #[test]
    fn umbrella_keeps_the_label() {
        let failure = DispatchFailure::new(FailureReason::MissingPayload, tag_only::<u8>("some"));
        match CoproductError::from(failure) {
            CoproductError::Dispatch { tag, message } => {
                assert_eq!(tag, "some");
                assert_eq!(message, "Missing payload for branch: some");
            }
            other => panic!("Expected dispatch error, got {:?}", other),
        }
    }

    #[test]
    fn umbrella_displays_like_the_failure() {
        let failure = DispatchFailure::new(FailureReason::UnexpectedInput, tag_only::<()>("zap"));
        let shown = failure.to_string();
        assert_eq!(CoproductError::from(failure).to_string(), shown);
        assert_eq!(shown, "Unexpected input: zap");
    }
}
