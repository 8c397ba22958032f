use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ranker::models::{JobStatusResponse, ResultSet};
use ranker::results::render::{render_progress, render_results};
use ranker::results::{LoggingDownloader, ResultsView, SortDirection, SortKey, SortState};
use ranker::upload::{UploadFile, UploadForm, UploadPage};
use ranker::{AppError, Config, PollHandle, RankingClient};

/// Command-line front end for the resume ranking service
#[derive(Parser, Debug)]
#[command(name = "ranker")]
#[command(about = "Upload resumes for AI ranking and review the ranked candidates")]
#[command(version)]
struct Cli {
    /// Ranking service base URL (overrides RANKER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Status poll interval in milliseconds (overrides RANKER_POLL_INTERVAL_MS)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload resumes, wait for the ranking and show the results
    Rank {
        #[command(flatten)]
        input: UploadArgs,
        #[command(flatten)]
        display: DisplayArgs,
        /// Delete the job's files on the service once results are shown
        #[arg(long)]
        cleanup: bool,
    },
    /// Upload resumes and print the new job id
    Upload {
        #[command(flatten)]
        input: UploadArgs,
    },
    /// Check a job's status once
    Status { job_id: String },
    /// Poll a job until it completes or fails
    Watch { job_id: String },
    /// Show the ranked candidates of a completed job
    Results {
        job_id: String,
        #[command(flatten)]
        display: DisplayArgs,
        /// Open the detail view for this candidate id
        #[arg(long)]
        show: Option<String>,
        /// Request this candidate's resume file
        #[arg(long)]
        download: Option<String>,
    },
    /// Delete a job and its uploaded files
    Cleanup { job_id: String },
    /// Check that the ranking service is reachable
    Health,
}

#[derive(Args, Debug)]
struct UploadArgs {
    /// Resume PDF files (1 to 10)
    files: Vec<PathBuf>,

    /// Job description text
    #[arg(long, short = 'd', conflicts_with = "job_description_file")]
    job_description: Option<String>,

    /// Read the job description from a file
    #[arg(long)]
    job_description_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DisplayArgs {
    /// Sort key: score, name or experience
    #[arg(long, default_value = "score")]
    sort: SortKey,

    /// Sort ascending instead of descending
    #[arg(long)]
    ascending: bool,
}

impl DisplayArgs {
    fn sort_state(&self) -> SortState {
        let direction = if self.ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        SortState::new(self.sort, direction)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    if let Some(ms) = cli.interval_ms {
        config.poll_interval = Duration::from_millis(ms);
    }

    // Logs go to stderr so rendered results on stdout stay clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Ranking service at {}", config.api_url);
    let client = RankingClient::new(&config.client_config())?;

    if let Err(e) = run(cli.command, &client, &config).await {
        return match e.downcast_ref::<AppError>() {
            Some(app) => {
                error!("{app:?}");
                eprintln!("error: {}", app.user_message());
                std::process::exit(app.exit_code());
            }
            None => Err(e),
        };
    }
    Ok(())
}

async fn run(command: Command, client: &RankingClient, config: &Config) -> Result<()> {
    match command {
        Command::Rank {
            input,
            display,
            cleanup,
        } => rank(client, config, &input, &display, cleanup).await,
        Command::Upload { input } => {
            let page = UploadPage::new(client.clone());
            let mut form = fill_form(&input).await?;
            let outcome = page.submit(&mut form).await.map_err(AppError::from)?;
            report_failed_files(&outcome.job.failed_files);
            println!("{}", outcome.job.job_id);
            eprintln!("Results will be at {}", outcome.route);
            Ok(())
        }
        Command::Status { job_id } => {
            let status = client.status(&job_id).await.map_err(AppError::from)?;
            println!("{}", render_progress(&status));
            if let Some(ts) = status.timestamp {
                println!("Updated {}", ts.to_rfc3339());
            }
            if !status.status.is_terminal() {
                eprintln!("Job {job_id} is still running; `ranker watch {job_id}` follows it");
            }
            Ok(())
        }
        Command::Watch { job_id } => {
            let done = watch_job(client, &job_id, config.poll_interval).await?;
            println!("{}", render_progress(&done));
            Ok(())
        }
        Command::Results {
            job_id,
            display,
            show,
            download,
        } => {
            let results = client.results(&job_id).await.map_err(AppError::from)?;
            let mut view = ResultsView::new(results);
            view.set_sort(display.sort_state());
            if let Some(id) = show.as_deref() {
                if view.open_detail(id).is_none() {
                    warn!("No candidate with id {id} in job {job_id}");
                }
            }
            if let Some(id) = download.as_deref() {
                view.download_resume(id, &LoggingDownloader)?;
            }
            print!("{}", render_results(&view));
            Ok(())
        }
        Command::Cleanup { job_id } => {
            let confirmation = client.cleanup(&job_id).await.map_err(AppError::from)?;
            println!(
                "{}",
                confirmation
                    .message
                    .unwrap_or_else(|| format!("Job {job_id} cleaned up"))
            );
            Ok(())
        }
        Command::Health => {
            let health = client.health().await.map_err(AppError::from)?;
            println!("Ranking service: {}", health.status);
            if let (Some(files), Some(mb)) = (health.max_files, health.max_file_size_mb) {
                println!("Limits: {files} files, {mb} MB per file");
            }
            Ok(())
        }
    }
}

/// Submits the resumes, waits for the ranking and prints the results.
async fn rank(
    client: &RankingClient,
    config: &Config,
    input: &UploadArgs,
    display: &DisplayArgs,
    cleanup: bool,
) -> Result<()> {
    let page = UploadPage::new(client.clone());
    let mut form = fill_form(input).await?;
    // The form clears itself on success.
    let job_description = form.job_description().to_string();

    let outcome = page.submit(&mut form).await.map_err(AppError::from)?;
    let job_id = outcome.job.job_id.clone();
    report_failed_files(&outcome.job.failed_files);
    eprintln!("Job {job_id} created; waiting for ranking (Ctrl-C to stop)");

    watch_job(client, &job_id, config.poll_interval).await?;

    let mut results: ResultSet = client.results(&job_id).await.map_err(AppError::from)?;
    if results.job_description.is_empty() {
        results.job_description = job_description;
    }
    let mut view = ResultsView::new(results);
    view.set_sort(display.sort_state());
    print!("{}", render_results(&view));

    if cleanup {
        client.cleanup(&job_id).await.map_err(AppError::from)?;
        eprintln!("Cleaned up job {job_id}");
    }
    Ok(())
}

async fn fill_form(input: &UploadArgs) -> Result<UploadForm> {
    let mut files = Vec::with_capacity(input.files.len());
    for path in &input.files {
        files.push(UploadFile::from_path(path).await?);
    }

    let mut form = UploadForm::new();
    form.select_files(files).map_err(AppError::from)?;
    form.set_job_description(read_description(input).await?);
    Ok(form)
}

async fn read_description(input: &UploadArgs) -> Result<String> {
    match (&input.job_description, &input.job_description_file) {
        (Some(text), _) => Ok(text.clone()),
        (None, Some(path)) => read_text(path).await,
        (None, None) => Ok(String::new()),
    }
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read job description from {}", path.display()))
}

/// Polls with a progress line per check; Ctrl-C cancels the poll.
async fn watch_job(
    client: &RankingClient,
    job_id: &str,
    interval: Duration,
) -> Result<JobStatusResponse, AppError> {
    let handle = PollHandle::spawn(Arc::new(client.clone()), job_id, interval, |status| {
        eprintln!("{}", render_progress(status))
    });

    let cancel = handle.cancel_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping status polling");
            cancel.cancel();
        }
    });

    let result = handle.join().await;
    interrupt.abort();
    result.map_err(AppError::from)
}

fn report_failed_files(failed: &[ranker::models::FailedFile]) {
    for f in failed {
        eprintln!("warning: {} was not accepted: {}", f.filename, f.error);
    }
}
