// Upload side: file model, validation utilities, the form state machine and
// the page that turns a valid form into a ranking job.

pub mod file;
pub mod form;
pub mod page;
pub mod validation;

pub use file::UploadFile;
pub use form::{SubmitError, UploadForm, UploadPayload};
pub use page::{UploadOutcome, UploadPage};
pub use validation::{FileError, ValidationErrors, MAX_FILES, MAX_FILE_SIZE};
