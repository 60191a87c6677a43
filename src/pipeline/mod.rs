//! Pipeline orchestration: bounded task pool, progress state, and the analyzer
//!
//! The stages themselves live in `crawler`, `imaging`, and `moderation`;
//! this module wires them together and owns the shared per-run state.

mod analyzer;
mod pool;
mod progress;

pub use analyzer::{AnalysisReport, WebImageAnalyzer};
pub use pool::TaskPool;
pub use progress::{ImageRecord, ProgressSnapshot, ProgressTracker};
