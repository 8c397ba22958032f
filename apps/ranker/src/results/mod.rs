// Results screen: client-side ordering, aggregate stats, the view state with
// its detail overlay, and text rendering.

pub mod render;
pub mod sorting;
pub mod stats;
pub mod view;

pub use sorting::{SortDirection, SortKey, SortState};
pub use stats::{compute_stats, ResultStats, ScoreBand};
pub use view::{LoggingDownloader, ResultsView, ResumeDownloader};
