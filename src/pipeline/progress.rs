//! Shared progress state for a single analysis run
//!
//! Analysis workers mutate the tracker as they finish; a presentation layer
//! polls it through cloned snapshots. The lock is held only for the
//! mutation or the clone, never across I/O, so polling cannot stall the
//! workers.

use crate::moderation::ModerationLabel;
use serde::Serialize;
use std::sync::Mutex;

/// The analysis result for one unique image content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    /// URL the content was first downloaded from
    pub url: String,

    /// Content fingerprint of the canonical bytes
    pub content_hash: String,

    /// Moderation labels; empty when the image is clean
    pub labels: Vec<ModerationLabel>,

    /// Size of the canonical payload in bytes
    pub byte_size: usize,
}

impl ImageRecord {
    /// A flagged record carries at least one moderation label
    pub fn is_flagged(&self) -> bool {
        !self.labels.is_empty()
    }
}

/// Point-in-time view of a run's progress
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProgressSnapshot {
    /// Image URLs attempted so far, whatever their outcome
    pub processed: usize,

    /// Unique image URLs the run will attempt; fixed before analysis starts
    pub total: usize,

    /// Flagged records accumulated so far, in completion order
    pub flagged: Vec<ImageRecord>,
}

/// Mutable progress state shared between analysis workers and pollers
#[derive(Debug, Default)]
pub struct ProgressTracker {
    inner: Mutex<ProgressSnapshot>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalizes the total for a run; called exactly once before analysis begins
    pub fn set_total(&self, total: usize) {
        let mut state = self.inner.lock().unwrap();
        state.processed = 0;
        state.total = total;
        state.flagged.clear();
    }

    /// Counts one attempted image URL, whatever its outcome
    pub fn record_processed(&self) {
        self.inner.lock().unwrap().processed += 1;
    }

    /// Appends a flagged record
    pub fn record_flagged(&self, record: ImageRecord) {
        self.inner.lock().unwrap().flagged.push(record);
    }

    /// Returns a cloned snapshot of the current state
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.inner.lock().unwrap().clone()
    }
}
