use std::fmt;

use thiserror::Error;

use crate::upload::file::{UploadFile, PDF_MEDIA_TYPE};

pub const MAX_FILES: usize = 10;
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Batch-level file problems. Any of these rejects the whole selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("Please select at least one PDF file")]
    Empty,

    #[error("Only PDF files are allowed")]
    InvalidType { name: String },

    #[error("File {name} is too large. Maximum size is 10MB")]
    TooLarge { name: String },

    #[error("Maximum 10 files allowed")]
    TooMany { count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is required")]
pub struct RequiredFieldError {
    pub field: &'static str,
}

/// Field-level messages collected by the upload form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub files: Option<FileError>,
    pub job_description: Option<RequiredFieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.files.is_none() && self.job_description.is_none()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = [
            self.files.as_ref().map(ToString::to_string),
            self.job_description.as_ref().map(ToString::to_string),
        ]
        .into_iter()
        .flatten()
        .collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn is_pdf(file: &UploadFile) -> bool {
    file.media_type == PDF_MEDIA_TYPE
}

/// Every file must carry the PDF media type.
pub fn validate_file_types(files: &[UploadFile]) -> Result<(), FileError> {
    match files.iter().find(|f| !is_pdf(f)) {
        Some(bad) => Err(FileError::InvalidType {
            name: bad.name.clone(),
        }),
        None => Ok(()),
    }
}

pub fn validate_file_sizes(files: &[UploadFile]) -> Result<(), FileError> {
    match files.iter().find(|f| f.size() > MAX_FILE_SIZE) {
        Some(big) => Err(FileError::TooLarge {
            name: big.name.clone(),
        }),
        None => Ok(()),
    }
}

/// Between 1 and `MAX_FILES` inclusive.
pub fn validate_file_count(count: usize) -> Result<(), FileError> {
    if count == 0 {
        Err(FileError::Empty)
    } else if count > MAX_FILES {
        Err(FileError::TooMany { count })
    } else {
        Ok(())
    }
}

/// Full batch check: type, then size, then count.
pub fn validate_files(files: &[UploadFile]) -> Result<(), FileError> {
    validate_file_types(files)?;
    validate_file_sizes(files)?;
    validate_file_count(files.len())
}

/// Non-empty after trimming whitespace.
pub fn validate_required(value: &str, field: &'static str) -> Result<(), RequiredFieldError> {
    if value.trim().is_empty() {
        Err(RequiredFieldError { field })
    } else {
        Ok(())
    }
}

pub fn validate_job_description(value: &str) -> Result<(), RequiredFieldError> {
    validate_required(value, "Job description")
}
