use serde::Serialize;

use crate::models::Candidate;

pub const EXCELLENT_THRESHOLD: f64 = 80.0;
pub const GOOD_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            ScoreBand::Excellent
        } else if score >= GOOD_THRESHOLD {
            ScoreBand::Good
        } else {
            ScoreBand::Fair
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
        }
    }
}

/// Aggregates over the full candidate set, independent of sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResultStats {
    pub total: usize,
    /// score ≥ 80
    pub excellent: usize,
    /// 60 ≤ score < 80
    pub good: usize,
    /// Mean score rounded to the nearest integer; 0 for an empty set.
    pub average: u32,
}

pub fn compute_stats(candidates: &[Candidate]) -> ResultStats {
    if candidates.is_empty() {
        return ResultStats::default();
    }

    let mut stats = ResultStats {
        total: candidates.len(),
        ..Default::default()
    };
    let mut sum = 0.0;
    for c in candidates {
        sum += c.score;
        match ScoreBand::of(c.score) {
            ScoreBand::Excellent => stats.excellent += 1,
            ScoreBand::Good => stats.good += 1,
            ScoreBand::Fair => {}
        }
    }
    stats.average = (sum / candidates.len() as f64).round().max(0.0) as u32;
    stats
}
