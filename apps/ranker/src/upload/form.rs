//! Upload form state: selected files, job description, field errors and the
//! submit lifecycle.
//!
//! The file picker and the drop target both go through `accept_files`, so a
//! dropped batch is validated exactly like a picked one. State is cleared only
//! after a successful submit; a failed submit keeps the selection for retry.

use std::fmt::Display;
use std::future::Future;

use thiserror::Error;
use tracing::{debug, warn};

use crate::upload::file::UploadFile;
use crate::upload::validation::{
    validate_file_count, validate_files, validate_job_description, FileError, ValidationErrors,
};

pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit. Please try again.";

/// Everything the create-job call needs. Lives for one submit.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPayload {
    pub files: Vec<UploadFile>,
    pub job_description: String,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("A submission is already in progress")]
    Busy,

    /// The submit callback failed. `cause` is kept for logs; users see the
    /// generic message.
    #[error("{}", SUBMIT_FAILED_MESSAGE)]
    Failed { cause: String },
}

#[derive(Debug, Default)]
pub struct UploadForm {
    files: Vec<UploadFile>,
    job_description: String,
    errors: ValidationErrors,
    submitting: bool,
    submit_error: Option<String>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Submit control is disabled while a submit is pending.
    pub fn can_submit(&self) -> bool {
        !self.submitting
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Files chosen through the file picker.
    pub fn select_files(&mut self, files: Vec<UploadFile>) -> Result<(), FileError> {
        self.accept_files(files)
    }

    /// Files dropped onto the drop target.
    pub fn drop_files(&mut self, files: Vec<UploadFile>) -> Result<(), FileError> {
        self.accept_files(files)
    }

    /// Replaces the selection with `files` if the whole batch is valid.
    /// A rejected batch leaves the previous selection untouched.
    fn accept_files(&mut self, files: Vec<UploadFile>) -> Result<(), FileError> {
        if let Err(e) = validate_files(&files) {
            debug!("Rejected file batch of {}: {e}", files.len());
            self.errors.files = Some(e.clone());
            return Err(e);
        }
        self.files = files;
        self.errors.files = None;
        Ok(())
    }

    pub fn remove_file(&mut self, index: usize) -> Option<UploadFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn set_job_description(&mut self, text: impl Into<String>) {
        self.job_description = text.into();
        if self.errors.job_description.is_some()
            && validate_job_description(&self.job_description).is_ok()
        {
            self.errors.job_description = None;
        }
    }

    fn validate(&mut self) -> Result<(), ValidationErrors> {
        let errors = ValidationErrors {
            files: validate_file_count(self.files.len()).err(),
            job_description: validate_job_description(&self.job_description).err(),
        };
        self.errors = errors.clone();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validates and enters the pending state. Nothing is sent unless this
    /// returns a payload.
    pub fn begin_submit(&mut self) -> Result<UploadPayload, SubmitError> {
        if self.submitting {
            return Err(SubmitError::Busy);
        }
        self.validate().map_err(SubmitError::Validation)?;

        self.submitting = true;
        self.submit_error = None;
        Ok(UploadPayload {
            files: self.files.clone(),
            job_description: self.job_description.clone(),
        })
    }

    /// Leaves the pending state. Success clears the form; failure keeps the
    /// selection and description so the user can retry.
    pub fn finish_submit<T, E: Display>(&mut self, outcome: &Result<T, E>) {
        self.submitting = false;
        match outcome {
            Ok(_) => {
                self.files.clear();
                self.job_description.clear();
                self.errors = ValidationErrors::default();
                self.submit_error = None;
            }
            Err(e) => {
                warn!("Resume submission failed: {e}");
                self.submit_error = Some(SUBMIT_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Runs the full submit path with a caller-supplied handler.
    pub async fn submit<F, Fut, T, E>(&mut self, on_submit: F) -> Result<T, SubmitError>
    where
        F: FnOnce(UploadPayload) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let payload = self.begin_submit()?;
        let pending = PendingSubmit { form: self };
        let outcome = on_submit(payload).await;
        pending.form.finish_submit(&outcome);
        outcome.map_err(|e| SubmitError::Failed {
            cause: e.to_string(),
        })
    }
}

/// Leaves the pending state if a submit future is dropped before the
/// handler finishes. The selection is kept.
struct PendingSubmit<'a> {
    form: &'a mut UploadForm,
}

impl Drop for PendingSubmit<'_> {
    fn drop(&mut self) {
        if self.form.submitting {
            warn!("Resume submission abandoned before it finished");
            self.form.submitting = false;
        }
    }
}
