//! Run statistics, reported as JSON at the end of a run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::spans::Verdict;

/// Counters for one run over both streams.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Documents read from the text stream
    pub documents: usize,
    /// Annotations validated against a document
    pub annotations: usize,
    pub accepted: usize,
    /// Rejections by reason
    pub rejected: BTreeMap<&'static str, usize>,
    /// Annotation rows skipped because their document was absent or already passed
    pub dropped: usize,
}

impl RunStats {
    pub fn record(&mut self, verdict: &Verdict) {
        self.annotations += 1;
        match verdict.rejection() {
            None => self.accepted += 1,
            Some(rejection) => *self.rejected.entry(rejection.reason()).or_default() += 1,
        }
    }

    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }
}
