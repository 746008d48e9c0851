use thiserror::Error;

use crate::usecase::ports::api::ApiError;

/// Client-side precondition failures. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no variants selected")]
    EmptySelection,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{0}")]
    ServerReported(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("response for request #{sequence} superseded by request #{latest}")]
    StaleResponseDiscarded { sequence: u64, latest: u64 },
}

impl ControllerError {
    /// Stale responses are dropped silently; everything else is shown.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, ControllerError::StaleResponseDiscarded { .. })
    }
}

impl From<ApiError> for ControllerError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(message) => ControllerError::Transport(message),
            ApiError::ServerReported(message) => ControllerError::ServerReported(message),
        }
    }
}
