//! Error types for CRM API and endpoint model operations.

use thiserror::Error;

use crate::record::Lifecycle;

/// Errors that can occur while talking to the CRM host or mutating models.
#[derive(Debug, Error)]
pub enum CrmError {
    /// Configuration is missing or incomplete.
    #[error("CRM configuration required: {0}")]
    ConfigMissing(String),

    /// Required fields are missing for the requested write.
    #[error("{entity} is missing required fields: {}", missing.join(", "))]
    Validation {
        entity: &'static str,
        missing: Vec<String>,
    },

    /// Operation is illegal for the model's lifecycle state.
    #[error("cannot {operation} {entity} in state {state}")]
    InvalidState {
        entity: &'static str,
        state: Lifecycle,
        operation: &'static str,
    },

    /// A setter was given a value outside the field's declared domain.
    #[error("invalid value for '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    /// Collection element type mismatch.
    #[error("collection of {expected} cannot hold {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The host answered with a non-2xx status.
    #[error("CRM API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response was valid JSON but not the expected shape.
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Reading plugin configuration failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrmError {
    /// HTTP status code, when the host answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CrmError::Api { status, .. } => Some(*status),
            CrmError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error came from the transport layer (network, non-2xx
    /// status or an undecodable body) rather than from local checks.
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            CrmError::Api { .. }
                | CrmError::Transport(_)
                | CrmError::Parse(_)
                | CrmError::InvalidResponse(_)
        )
    }
}

/// Result type alias for CRM operations.
pub type Result<T> = core::result::Result<T, CrmError>;
