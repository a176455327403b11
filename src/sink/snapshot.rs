//! Latest-result snapshot
//!
//! Holds the most recent encoded document so it can be served on request
//! over the console instead of being pushed.

use super::{ResultSink, SpectrumReport};
use crate::error::SinkError;

/// Sink keeping only the latest JSON document
pub struct SnapshotSink<const CAP: usize> {
    document: [u8; CAP],
    len: usize,
    updates: u32,
}

impl<const CAP: usize> SnapshotSink<CAP> {
    /// Create an empty snapshot
    #[must_use]
    pub const fn new() -> Self {
        Self {
            document: [0; CAP],
            len: 0,
            updates: 0,
        }
    }

    /// Latest document, if one was stored
    #[must_use]
    pub fn latest(&self) -> Option<&[u8]> {
        (self.len > 0).then(|| &self.document[..self.len])
    }

    /// Number of documents stored so far
    #[must_use]
    pub const fn updates(&self) -> u32 {
        self.updates
    }

    /// Drop the stored document
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const CAP: usize> Default for SnapshotSink<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> ResultSink for SnapshotSink<CAP> {
    fn emit(&mut self, report: &SpectrumReport<'_>) -> Result<(), SinkError> {
        // A failed encode leaves a partial document behind
        self.len = 0;
        self.len = report.encode_json(&mut self.document)?;
        self.updates = self.updates.wrapping_add(1);
        Ok(())
    }
}
