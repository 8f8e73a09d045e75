use std::fmt;
use thiserror::Error;

/// API call that produced a [`ApiError::Fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Configuration,
    PartInfo,
    AllowedStatuses,
    UpdatePart,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Operation::Configuration => "Error fetching configuration",
            Operation::PartInfo => "Error fetching part info",
            Operation::AllowedStatuses => "Error fetching allowed part statuses",
            Operation::UpdatePart => "Error updating part info",
        };
        f.write_str(text)
    }
}

/// Non-2xx responses, transport failures and undecodable bodies all land
/// here; callers do not distinguish between them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Health check failed: {0}")]
    Connectivity(String),
    #[error("{operation}: {reason}")]
    Fetch { operation: Operation, reason: String },
}

impl ApiError {
    pub fn fetch(operation: Operation, reason: impl Into<String>) -> Self {
        ApiError::Fetch {
            operation,
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ApiError::Connectivity(reason) => reason,
            ApiError::Fetch { reason, .. } => reason,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
