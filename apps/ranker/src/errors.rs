use thiserror::Error;

use crate::ranking_client::ClientError;
use crate::upload::form::{SubmitError, SUBMIT_FAILED_MESSAGE};
use crate::upload::validation::{FileError, ValidationErrors};

/// User-facing error categories.
/// Every failure ends as one message line; none of them is fatal to the app.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input caught before any network call.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// HTTP non-success or network failure.
    #[error("{0}")]
    Transport(ClientError),

    /// The submit handler failed; `cause` is the underlying transport message.
    #[error("{}", SUBMIT_FAILED_MESSAGE)]
    Submission { cause: String },

    /// The ranking service reported the job as failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    #[error("Cancelled")]
    Cancelled,
}

impl AppError {
    /// Banner text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Submission { cause } => format!("{SUBMIT_FAILED_MESSAGE} ({cause})"),
            other => other.to_string(),
        }
    }

    /// Process exit status for the command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Validation(_) => 2,
            AppError::Transport(_) | AppError::Submission { .. } => 3,
            AppError::JobFailed(_) => 4,
            AppError::Cancelled => 130,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::JobFailed(message) => AppError::JobFailed(message),
            ClientError::Cancelled => AppError::Cancelled,
            other => AppError::Transport(other),
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Validation(errors) => AppError::Validation(errors),
            SubmitError::Failed { cause } => AppError::Submission { cause },
            SubmitError::Busy => AppError::Submission {
                cause: SubmitError::Busy.to_string(),
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        AppError::Validation(e)
    }
}

impl From<FileError> for AppError {
    fn from(e: FileError) -> Self {
        AppError::Validation(ValidationErrors {
            files: Some(e),
            job_description: None,
        })
    }
}
