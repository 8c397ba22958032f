use tracing::info;

use crate::models::CreatedJob;
use crate::ranking_client::{ClientError, RankingClient};
use crate::routes::Route;
use crate::upload::form::{SubmitError, UploadForm, UploadPayload};

/// Where the page goes after a successful upload, plus what the service said.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub route: Route,
    pub job: CreatedJob,
}

/// Wraps the upload form and owns the create-job call. One attempt per
/// submit; failures flow back into the form's failure path.
#[derive(Debug, Clone)]
pub struct UploadPage {
    client: RankingClient,
}

impl UploadPage {
    pub fn new(client: RankingClient) -> Self {
        Self { client }
    }

    pub async fn create_job(&self, payload: UploadPayload) -> Result<UploadOutcome, ClientError> {
        let job = self
            .client
            .create(&payload.files, &payload.job_description)
            .await?;
        let route = Route::results(job.job_id.clone());
        info!("Navigating to {route}");
        Ok(UploadOutcome { route, job })
    }

    pub async fn submit(&self, form: &mut UploadForm) -> Result<UploadOutcome, SubmitError> {
        form.submit(|payload| self.create_job(payload)).await
    }
}
