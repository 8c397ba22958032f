use std::fmt;

/// Views the front end can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Upload,
    Results { job_id: String },
}

impl Route {
    pub fn results(job_id: impl Into<String>) -> Self {
        Route::Results {
            job_id: job_id.into(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Upload => "/".to_string(),
            Route::Results { job_id } => format!("/results/{job_id}"),
        }
    }

    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "/upload" {
            return Some(Route::Upload);
        }
        trimmed
            .strip_prefix("/results/")
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .map(Route::results)
    }

    pub fn job_id(&self) -> Option<&str> {
        match self {
            Route::Results { job_id } => Some(job_id),
            Route::Upload => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
