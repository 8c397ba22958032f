use anyhow::{bail, Result};
use tracing::info;

use crate::models::{Candidate, CandidateId, ResultSet};
use crate::results::sorting::{sorted, SortKey, SortState};
use crate::results::stats::{compute_stats, ResultStats};

/// Fetches a candidate's original resume file. The service exposes no
/// download endpoint, so the only implementation just records the request.
pub trait ResumeDownloader {
    fn download(&self, candidate: &Candidate) -> Result<()>;
}

pub struct LoggingDownloader;

impl ResumeDownloader for LoggingDownloader {
    fn download(&self, candidate: &Candidate) -> Result<()> {
        info!(
            "Resume download requested for candidate {} ({})",
            candidate.id, candidate.name
        );
        Ok(())
    }
}

/// State behind the results screen: the fetched set, the active sort and the
/// candidate shown in the detail overlay.
#[derive(Debug, Clone)]
pub struct ResultsView {
    results: ResultSet,
    stats: ResultStats,
    sort: SortState,
    selected: Option<CandidateId>,
}

impl ResultsView {
    pub fn new(results: ResultSet) -> Self {
        let stats = compute_stats(&results.candidates);
        Self {
            results,
            stats,
            sort: SortState::default(),
            selected: None,
        }
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn job_description(&self) -> &str {
        &self.results.job_description
    }

    pub fn stats(&self) -> ResultStats {
        self.stats
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    /// Header click on `key`.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
    }

    pub fn display_order(&self) -> Vec<&Candidate> {
        sorted(&self.results.candidates, self.sort)
    }

    /// Opens the detail overlay. Unknown ids leave the view unchanged.
    pub fn open_detail(&mut self, id: &str) -> Option<&Candidate> {
        let candidate = self.results.find(id)?;
        self.selected = Some(candidate.id.clone());
        Some(candidate)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Candidate> {
        let id = self.selected.as_ref()?;
        self.results.find(&id.0)
    }

    pub fn download_resume(&self, id: &str, downloader: &dyn ResumeDownloader) -> Result<()> {
        let Some(candidate) = self.results.find(id) else {
            bail!("No candidate with id {id}");
        };
        downloader.download(candidate)
    }
}
