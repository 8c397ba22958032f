use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Candidate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Score,
    Name,
    Experience,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Key plus direction. Defaults to score, highest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Column-header behaviour: the active key flips direction, a new key
    /// starts descending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.flipped())
        } else {
            Self::new(key, SortDirection::Descending)
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" => Ok(SortKey::Score),
            "name" => Ok(SortKey::Name),
            "experience" | "exp" => Ok(SortKey::Experience),
            other => Err(format!(
                "unknown sort key '{other}' (expected score, name or experience)"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortKey::Score => "score",
            SortKey::Name => "name",
            SortKey::Experience => "experience",
        })
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        })
    }
}

/// Ascending comparison on `key`. Names compare case-insensitively.
pub fn compare_by(a: &Candidate, b: &Candidate, key: SortKey) -> Ordering {
    match key {
        SortKey::Score => a.score.total_cmp(&b.score),
        SortKey::Experience => a.experience.total_cmp(&b.experience),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

/// Display order for `candidates`. The input order is never changed and equal
/// keys keep their input order in either direction.
pub fn sorted(candidates: &[Candidate], sort: SortState) -> Vec<&Candidate> {
    let mut order: Vec<&Candidate> = candidates.iter().collect();
    // `sort_by` is stable; reversing the comparator (not the output) keeps
    // ties in input order for descending too.
    order.sort_by(|a, b| {
        let ord = compare_by(a, b, sort.key);
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    order
}
