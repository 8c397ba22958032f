//! In-process stand-in for the ranking service, used by client and page tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::ranking_client::{JOB_DESCRIPTION_FIELD, RESUMES_FIELD};

#[derive(Debug, Clone)]
pub struct RecordedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordedUpload {
    pub files: Vec<RecordedFile>,
    pub job_description: Option<String>,
    pub unexpected_fields: Vec<String>,
}

/// Scripted responses plus everything the fake saw.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    /// Overrides the default 202 `{job_id: "job-123"}` upload response.
    pub upload_response: Option<(u16, Value)>,
    /// Served front to back; once empty every poll answers `processing`.
    pub status_script: VecDeque<(u16, Value)>,
    /// Result bodies by job id; unknown ids get a 404.
    pub results: HashMap<String, Value>,
    pub uploads: Vec<RecordedUpload>,
    pub status_calls: usize,
    pub cleaned: Vec<String>,
}

type Shared = Arc<Mutex<Recorded>>;

pub struct FakeService {
    pub base_url: String,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeService {
    pub async fn start(recorded: Recorded) -> Self {
        let state: Shared = Arc::new(Mutex::new(recorded));
        let app = Router::new()
            .route("/api/upload-resumes", post(upload))
            .route("/api/job-status/:job_id", get(job_status))
            .route("/api/job-results/:job_id", get(job_results))
            .route("/api/job/:job_id", delete(cleanup))
            .route("/health", get(health))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            server,
        }
    }

    pub fn recorded(&self) -> Recorded {
        self.state.lock().unwrap().clone()
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn reply(status: u16, body: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::from_u16(status).unwrap(), Json(body))
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> (StatusCode, Json<Value>) {
    let mut recorded = RecordedUpload::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap();
        match name.as_str() {
            RESUMES_FIELD => recorded.files.push(RecordedFile {
                file_name,
                content_type,
                size: data.len(),
            }),
            JOB_DESCRIPTION_FIELD => {
                recorded.job_description = Some(String::from_utf8_lossy(&data).into_owned())
            }
            _ => recorded.unexpected_fields.push(name),
        }
    }

    let file_count = recorded.files.len();
    let mut state = state.lock().unwrap();
    state.uploads.push(recorded);
    match state.upload_response.clone() {
        Some((status, body)) => reply(status, body),
        None => reply(
            202,
            json!({
                "job_id": "job-123",
                "status": "processing",
                "message": "Files uploaded successfully. Processing started.",
                "files_processed": file_count,
                "files_failed": 0,
                "timestamp": "2024-05-01T12:00:00.000000"
            }),
        ),
    }
}

async fn job_status(
    State(state): State<Shared>,
    Path(job_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    state.status_calls += 1;
    match state.status_script.pop_front() {
        Some((status, body)) => reply(status, body),
        None => reply(200, json!({"job_id": job_id, "status": "processing"})),
    }
}

async fn job_results(
    State(state): State<Shared>,
    Path(job_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let state = state.lock().unwrap();
    match state.results.get(&job_id) {
        Some(body) => reply(200, body.clone()),
        None => reply(404, json!({"detail": "Job not found"})),
    }
}

async fn cleanup(
    State(state): State<Shared>,
    Path(job_id): Path<String>,
) -> (StatusCode, Json<Value>) {
    if job_id == "missing" {
        return reply(404, json!({"detail": "Job not found"}));
    }
    state.lock().unwrap().cleaned.push(job_id.clone());
    reply(
        200,
        json!({"job_id": job_id, "status": "cleaned", "message": "Job files cleaned up successfully"}),
    )
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": "2024-05-01T12:00:00.000000",
        "max_files": 10,
        "max_file_size_mb": 10.0
    }))
}
