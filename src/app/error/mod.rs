use crate::backend::BackendError;

/// Outcome of a wizard operation.
pub type AppResult<T, E = AppError> = std::result::Result<T, E>;

/// A common error type for every wizard step.
///
/// Nothing here is fatal: each variant is a message to show next to the step
/// that failed, after which the session carries on.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Failed to validate CSV: {0}")]
    Upload(#[source] BackendError),
    #[error("AI generation failed: {0}")]
    Generation(#[source] BackendError),
    #[error("{0}")]
    Send(#[source] BackendError),
    #[error("Please complete all previous steps before sending.")]
    NothingToSend,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl AppError {
    /// The backend's response status, when the failure came from one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Upload(e) | Self::Generation(e) | Self::Send(e) => e.status(),
            _ => None,
        }
    }
}
