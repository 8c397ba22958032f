//! Ranking Client: thin HTTP wrapper around the external ranking service.
//!
//! Every call is a single round trip with no retry. A non-success response is
//! turned into the operation's own error variant, carrying the server's message
//! when the body has one and a fixed per-operation fallback otherwise.

use std::time::Duration;

use reqwest::{multipart, Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{
    CleanupResponse, CreateJobResponse, CreatedJob, HealthResponse, JobStatusResponse, ResultSet,
};
use crate::upload::file::UploadFile;

pub mod polling;

pub use polling::{poll_status, JobStatusSource, PollHandle, DEFAULT_POLL_INTERVAL};

/// Multipart field carrying the resume files.
pub const RESUMES_FIELD: &str = "resumes";
/// Multipart field carrying the job description text.
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Upload { status: Option<u16>, message: String },

    #[error("{message}")]
    Status { status: Option<u16>, message: String },

    #[error("{message}")]
    Results { status: Option<u16>, message: String },

    #[error("{message}")]
    Cleanup { status: Option<u16>, message: String },

    #[error("{message}")]
    Health { status: Option<u16>, message: String },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Server response did not include a job id")]
    MissingJobId,

    /// Terminal failure reported by the service while polling.
    #[error("{0}")]
    JobFailed(String),

    #[error("Polling cancelled")]
    Cancelled,
}

impl ClientError {
    /// HTTP status of a non-success response, if this error came from one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::Upload { status, .. }
            | ClientError::Status { status, .. }
            | ClientError::Results { status, .. }
            | ClientError::Cleanup { status, .. }
            | ClientError::Health { status, .. } => *status,
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Which call failed; picks the error variant and the fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Upload,
    Status,
    Results,
    Cleanup,
    Health,
}

impl Operation {
    fn fallback_message(self) -> &'static str {
        match self {
            Operation::Upload => "Failed to upload resumes",
            Operation::Status => "Failed to get job status",
            Operation::Results => "Failed to get job results",
            Operation::Cleanup => "Failed to cleanup job",
            Operation::Health => "Ranking service is unavailable",
        }
    }

    fn error(self, status: Option<u16>, message: String) -> ClientError {
        match self {
            Operation::Upload => ClientError::Upload { status, message },
            Operation::Status => ClientError::Status { status, message },
            Operation::Results => ClientError::Results { status, message },
            Operation::Cleanup => ClientError::Cleanup { status, message },
            Operation::Health => ClientError::Health { status, message },
        }
    }
}

/// Connection settings for one client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankingClient {
    client: Client,
    base_url: Url,
}

impl RankingClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// POST /api/upload-resumes creates a ranking job.
    pub async fn create(
        &self,
        files: &[UploadFile],
        job_description: &str,
    ) -> Result<CreatedJob, ClientError> {
        let url = self.endpoint(&["api", "upload-resumes"]);
        debug!("Uploading {} resume(s) to {url}", files.len());

        let form = build_upload_form(files, job_description)?;
        let response = self.client.post(url).multipart(form).send().await?;
        let body: CreateJobResponse = read_json(response, Operation::Upload).await?;

        let job_id = body
            .job_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ClientError::MissingJobId)?;

        for failed in &body.failed_files {
            warn!("Service could not store {}: {}", failed.filename, failed.error);
        }
        info!(
            "Created ranking job {job_id} ({} file(s) accepted)",
            body.files_processed.unwrap_or(files.len() as u32)
        );

        Ok(CreatedJob {
            job_id,
            files_processed: body.files_processed,
            failed_files: body.failed_files,
            message: body.message,
        })
    }

    /// GET /api/job-status/{jobId}
    pub async fn status(&self, job_id: &str) -> Result<JobStatusResponse, ClientError> {
        let url = self.endpoint(&["api", "job-status", job_id]);
        let response = self.client.get(url).send().await?;
        read_json(response, Operation::Status).await
    }

    /// GET /api/job-results/{jobId}
    pub async fn results(&self, job_id: &str) -> Result<ResultSet, ClientError> {
        let url = self.endpoint(&["api", "job-results", job_id]);
        let response = self.client.get(url).send().await?;
        let mut results: ResultSet = read_json(response, Operation::Results).await?;
        if results.job_id.is_none() {
            results.job_id = Some(job_id.to_string());
        }
        debug!(
            "Fetched {} candidate(s) for job {job_id}",
            results.candidates.len()
        );
        Ok(results)
    }

    /// DELETE /api/job/{jobId}
    pub async fn cleanup(&self, job_id: &str) -> Result<CleanupResponse, ClientError> {
        let url = self.endpoint(&["api", "job", job_id]);
        let response = self.client.delete(url).send().await?;
        let body: CleanupResponse = read_json(response, Operation::Cleanup).await?;
        info!("Cleaned up job {job_id}");
        Ok(body)
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint(&["health"]);
        let response = self.client.get(url).send().await?;
        read_json(response, Operation::Health).await
    }
}

fn build_upload_form(
    files: &[UploadFile],
    job_description: &str,
) -> Result<multipart::Form, ClientError> {
    let mut form = multipart::Form::new().text(JOB_DESCRIPTION_FIELD, job_description.to_string());
    for file in files {
        let part = multipart::Part::bytes(file.content.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.media_type)?;
        form = form.part(RESUMES_FIELD, part);
    }
    Ok(form)
}

/// Decodes a success body, or turns a non-success response into `op`'s error.
async fn read_json<T: DeserializeOwned>(response: Response, op: Operation) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = server_message(&body).unwrap_or_else(|| {
            warn!("{op:?} failed with {status} and no error message");
            op.fallback_message().to_string()
        });
        return Err(op.error(Some(status.as_u16()), message));
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pulls a human-readable message out of an error body.
/// Checks `detail`, `message`, then `error` (plain or `{message}`), skipping
/// blank values.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "message", "error"].iter().find_map(|key| {
        let text = match value.get(key)? {
            Value::String(s) => s.as_str(),
            Value::Object(obj) => obj.get("message").and_then(Value::as_str)?,
            _ => return None,
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::{FakeService, Recorded};
    use crate::upload::validation::fixtures::pdfs;

    fn client_for(service: &FakeService) -> RankingClient {
        RankingClient::new(&ClientConfig {
            base_url: service.base_url.clone(),
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_server_message_detail() {
        assert_eq!(
            server_message(r#"{"detail": "Job not found"}"#).as_deref(),
            Some("Job not found")
        );
    }

    #[test]
    fn test_server_message_nested_error() {
        let body = r#"{"error": {"code": "NOT_FOUND", "message": "missing"}}"#;
        assert_eq!(server_message(body).as_deref(), Some("missing"));
    }

    #[test]
    fn test_server_message_absent() {
        assert_eq!(server_message("Internal Server Error"), None);
        assert_eq!(server_message(r#"{"detail": [{"loc": ["body"]}]}"#), None);
        assert_eq!(server_message(r#"{"message": "   "}"#), None);
    }

    #[test]
    fn test_server_message_skips_blank_fields() {
        assert_eq!(
            server_message(r#"{"detail": "  ", "message": "Too many files"}"#).as_deref(),
            Some("Too many files")
        );
        let body = r#"{"detail": "", "error": {"message": " Bad PDF "}}"#;
        assert_eq!(server_message(body).as_deref(), Some("Bad PDF"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = RankingClient::new(&ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
        let err = RankingClient::new(&ClientConfig::new("mailto:someone@example.com")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let client = RankingClient::new(&ClientConfig::new("http://localhost:8000")).unwrap();
        assert_eq!(
            client.endpoint(&["api", "job-status", "abc"]).as_str(),
            "http://localhost:8000/api/job-status/abc"
        );
        let client = RankingClient::new(&ClientConfig::new("http://host/ranker/")).unwrap();
        assert_eq!(
            client.endpoint(&["api", "job", "a/b"]).as_str(),
            "http://host/ranker/api/job/a%2Fb"
        );
    }

    #[tokio::test]
    async fn test_create_sends_files_and_description() {
        let service = FakeService::start(Recorded::default()).await;
        let client = client_for(&service);

        let job = client
            .create(&pdfs(3), "Backend engineer, Python, FastAPI")
            .await
            .unwrap();
        assert_eq!(job.job_id, "job-123");
        assert_eq!(job.files_processed, Some(3));

        let recorded = service.recorded();
        assert_eq!(recorded.uploads.len(), 1);
        let upload = &recorded.uploads[0];
        assert_eq!(
            upload.job_description.as_deref(),
            Some("Backend engineer, Python, FastAPI")
        );
        assert_eq!(upload.files.len(), 3);
        assert!(upload
            .files
            .iter()
            .all(|f| f.content_type.as_deref() == Some("application/pdf")));
        assert_eq!(upload.files[0].file_name.as_deref(), Some("resume-0.pdf"));
        assert!(upload.unexpected_fields.is_empty());
    }

    #[tokio::test]
    async fn test_create_error_uses_server_detail() {
        let service = FakeService::start(Recorded {
            upload_response: Some((
                400,
                json!({"detail": "Job description must be at least 10 characters long"}),
            )),
            ..Default::default()
        })
        .await;

        let err = client_for(&service).create(&pdfs(1), "short").await.unwrap_err();
        assert!(matches!(err, ClientError::Upload { status: Some(400), .. }));
        assert_eq!(
            err.to_string(),
            "Job description must be at least 10 characters long"
        );
    }

    #[tokio::test]
    async fn test_create_error_fallback_message() {
        let service = FakeService::start(Recorded {
            upload_response: Some((500, json!({}))),
            ..Default::default()
        })
        .await;

        let err = client_for(&service).create(&pdfs(1), "anything").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to upload resumes");
        assert_eq!(err.http_status(), Some(500));
    }

    #[tokio::test]
    async fn test_create_without_job_id() {
        let service = FakeService::start(Recorded {
            upload_response: Some((202, json!({"status": "processing"}))),
            ..Default::default()
        })
        .await;

        let err = client_for(&service).create(&pdfs(1), "anything").await.unwrap_err();
        assert!(matches!(err, ClientError::MissingJobId));
    }

    #[tokio::test]
    async fn test_status_and_results() {
        let mut recorded = Recorded::default();
        recorded
            .status_script
            .push_back((200, json!({"status": "processing", "progress": 40})));
        recorded.results.insert(
            "job-123".to_string(),
            json!({"candidates": [{"id": 1, "name": "Ada", "score": 92}]}),
        );
        let service = FakeService::start(recorded).await;
        let client = client_for(&service);

        let status = client.status("job-123").await.unwrap();
        assert_eq!(status.status, crate::models::JobStatus::Processing);
        assert_eq!(status.progress, Some(40));

        let results = client.results("job-123").await.unwrap();
        assert_eq!(results.job_id.as_deref(), Some("job-123"));
        assert_eq!(results.candidates.len(), 1);
    }

    #[tokio::test]
    async fn test_results_not_found() {
        let service = FakeService::start(Recorded::default()).await;
        let err = client_for(&service).results("nope").await.unwrap_err();
        assert!(matches!(err, ClientError::Results { status: Some(404), .. }));
        assert_eq!(err.to_string(), "Job not found");
    }

    #[tokio::test]
    async fn test_status_error_fallback() {
        let mut recorded = Recorded::default();
        recorded.status_script.push_back((503, json!(null)));
        let service = FakeService::start(recorded).await;

        let err = client_for(&service).status("job-123").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to get job status");
    }

    #[tokio::test]
    async fn test_cleanup() {
        let service = FakeService::start(Recorded::default()).await;
        let client = client_for(&service);

        let confirmation = client.cleanup("job-123").await.unwrap();
        assert_eq!(confirmation.status.as_deref(), Some("cleaned"));
        assert_eq!(service.recorded().cleaned, vec!["job-123".to_string()]);

        let err = client.cleanup("missing").await.unwrap_err();
        assert!(matches!(err, ClientError::Cleanup { status: Some(404), .. }));
    }

    #[tokio::test]
    async fn test_health() {
        let service = FakeService::start(Recorded::default()).await;
        let health = client_for(&service).health().await.unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.max_files, Some(10));
    }

    #[tokio::test]
    async fn test_network_error_is_http() {
        // Port 9 (discard) on localhost is closed in test environments.
        let client = RankingClient::new(&ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout: Duration::from_secs(2),
        })
        .unwrap();
        let err = client.status("job").await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
