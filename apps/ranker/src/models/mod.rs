pub mod candidate;
pub mod job;

pub use candidate::{Candidate, CandidateId, ResultSet};
pub use job::{
    CleanupResponse, CreateJobResponse, CreatedJob, FailedFile, HealthResponse, JobStatus,
    JobStatusResponse,
};
