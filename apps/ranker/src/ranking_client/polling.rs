//! Job-status polling.
//!
//! `poll_status` re-checks a job until it completes or fails. There is no
//! attempt limit and no overall timeout; a transport error on any single
//! check ends the whole poll without retry. Polling stops early when its
//! cancellation token fires, and the token is checked before every reschedule.
//!
//! `PollHandle` runs the loop as a task that is cancelled when the handle is
//! dropped, so a view that goes away cannot leave a poll running behind it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info, warn};

use crate::models::{JobStatus, JobStatusResponse};
use crate::ranking_client::{ClientError, RankingClient};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

const JOB_FAILED_FALLBACK: &str = "Job processing failed";

/// Anything that can report a job's current status.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ClientError>;
}

#[async_trait]
impl JobStatusSource for RankingClient {
    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse, ClientError> {
        self.status(job_id).await
    }
}

/// Polls until `completed` (returns that response) or `failed` (returns
/// `ClientError::JobFailed`). `on_progress` sees every response, the
/// terminal one included.
pub async fn poll_status<S, F>(
    source: &S,
    job_id: &str,
    interval: Duration,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<JobStatusResponse, ClientError>
where
    S: JobStatusSource + ?Sized,
    F: FnMut(&JobStatusResponse),
{
    let mut checks: u32 = 0;
    loop {
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = source.job_status(job_id) => result?,
        };
        checks += 1;
        debug!(
            "Job {job_id} check #{checks}: {} ({}%)",
            response.status,
            response.progress.unwrap_or(0)
        );

        on_progress(&response);

        match response.status {
            JobStatus::Completed => {
                info!("Job {job_id} completed after {checks} check(s)");
                return Ok(response);
            }
            JobStatus::Failed => {
                let message = response
                    .failure_message()
                    .unwrap_or(JOB_FAILED_FALLBACK)
                    .to_string();
                warn!("Job {job_id} failed: {message}");
                return Err(ClientError::JobFailed(message));
            }
            JobStatus::Unknown => {
                warn!("Job {job_id} reported an unrecognised status; polling continues")
            }
            JobStatus::Pending | JobStatus::Processing => {}
        }

        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

/// A running poll. Dropping the handle cancels it.
pub struct PollHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<JobStatusResponse, ClientError>>,
    _guard: DropGuard,
}

impl PollHandle {
    pub fn spawn<S, F>(
        source: Arc<S>,
        job_id: impl Into<String>,
        interval: Duration,
        on_progress: F,
    ) -> Self
    where
        S: JobStatusSource + ?Sized + 'static,
        F: FnMut(&JobStatusResponse) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let job_id = job_id.into();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            poll_status(source.as_ref(), &job_id, interval, &token, on_progress).await
        });

        Self {
            _guard: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }

    /// Stops the poll. The pending `join` resolves with `Cancelled`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token that cancels this poll, for wiring to external stop signals.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) -> Result<JobStatusResponse, ClientError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(ClientError::Cancelled),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }
}
