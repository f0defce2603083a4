//! Faults raised by operations and the stable codes they map to.

use serde_json::{Map, Value};

use crate::domain::{Error, ErrorCode};

/// Stable failure codes carried in `error.code`.
pub mod code {
    /// No resolvable session or team context.
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    /// Arguments rejected before or during the operation.
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    /// Domain rejection without a specific code.
    pub const OPERATION_FAILED: &str = "OPERATION_FAILED";
    /// Defect or panic; the message is always generic.
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    /// Caller's role lacks the permission the operation needs.
    pub const FORBIDDEN: &str = "FORBIDDEN";
    /// Target does not exist within the caller's team.
    pub const NOT_FOUND: &str = "NOT_FOUND";
    /// Target changed concurrently; retry with fresh state.
    pub const CONFLICT: &str = "CONFLICT";
    /// Another catalog item of the same kind already uses the name.
    pub const DUPLICATE_NAME: &str = "DUPLICATE_NAME";
    /// The change would leave the team without an owner.
    pub const LAST_OWNER: &str = "LAST_OWNER";
}

/// Message returned in place of any internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Boxed error source kept for logging only.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Why an operation did not produce a value.
///
/// `Validation` and `Rejected` are deliberate and reach the caller verbatim;
/// `Internal` is logged and replaced by a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ActionFault {
    /// Arguments were malformed; reported as `VALIDATION_ERROR`.
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        details: Option<Map<String, Value>>,
    },
    /// A business rule refused the call; `code` defaults to `OPERATION_FAILED`.
    #[error("operation rejected: {message}")]
    Rejected {
        message: String,
        code: Option<String>,
        details: Option<Map<String, Value>>,
    },
    /// Unexpected failure; only `source` is logged.
    #[error("internal fault: {source}")]
    Internal {
        #[source]
        source: BoxError,
    },
}

impl ActionFault {
    /// Invalid arguments.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Business-rule rejection with a specific code.
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            code: Some(code.into()),
            details: None,
        }
    }

    /// Business-rule rejection reported as `OPERATION_FAILED`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Unexpected failure.
    pub fn internal(source: impl Into<BoxError>) -> Self {
        Self::Internal {
            source: source.into(),
        }
    }

    /// Attach a detail entry. Internal faults never expose details.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self {
            Self::Validation { details, .. } | Self::Rejected { details, .. } => {
                details
                    .get_or_insert_with(Map::new)
                    .insert(key.into(), value.into());
            }
            Self::Internal { .. } => {}
        }
        self
    }

    /// Code the fault will carry on the wire.
    pub fn code(&self) -> &str {
        match self {
            Self::Validation { .. } => code::VALIDATION_ERROR,
            Self::Rejected { code, .. } => code.as_deref().unwrap_or(code::OPERATION_FAILED),
            Self::Internal { .. } => code::INTERNAL_ERROR,
        }
    }
}

fn details_map(details: Option<&Value>) -> Option<Map<String, Value>> {
    match details? {
        Value::Object(map) => Some(map.clone()),
        other => {
            let mut map = Map::new();
            map.insert("detail".into(), other.clone());
            Some(map)
        }
    }
}

impl From<Error> for ActionFault {
    fn from(error: Error) -> Self {
        let domain_code = match error.code() {
            ErrorCode::InvalidRequest => {
                return Self::Validation {
                    message: error.message().to_owned(),
                    details: details_map(error.details()),
                };
            }
            ErrorCode::ServiceUnavailable | ErrorCode::InternalError => {
                return Self::internal(error);
            }
            ErrorCode::Unauthorized => code::UNAUTHENTICATED,
            ErrorCode::Forbidden => code::FORBIDDEN,
            ErrorCode::NotFound => code::NOT_FOUND,
            ErrorCode::Conflict => code::CONFLICT,
        };
        Self::Rejected {
            message: error.message().to_owned(),
            code: Some(domain_code.to_owned()),
            details: details_map(error.details()),
        }
    }
}
