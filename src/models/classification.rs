use crate::models::disk::DiskRecord;
use serde::Serialize;

/// Result of one poll cycle. Rebuilt from scratch every time; never patched.
///
/// When `reachable` is false every list is empty and the result means
/// "unknown", not "no problems".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub all:                Vec<DiskRecord>,
    pub failed:             Vec<DiskRecord>,
    pub predictive_failure: Vec<DiskRecord>,
    pub not_in_use:         Vec<DiskRecord>,
    pub rebuilding:         Vec<DiskRecord>,
    pub needs_replacement:  Vec<DiskRecord>,
    pub reachable:          bool,
}

impl ClassificationResult {
    /// The result of a cycle whose live source could not be queried.
    pub fn unreachable() -> Self {
        Self { reachable: false, ..Self::default() }
    }

    /// True when at least one disk needs attention (and the data is live).
    pub fn has_findings(&self) -> bool {
        self.reachable && (
            !self.failed.is_empty()
            || !self.predictive_failure.is_empty()
            || !self.not_in_use.is_empty()
            || !self.rebuilding.is_empty()
        )
    }

    /// Category counts in report order.
    pub fn counts(&self) -> [(&'static str, usize); 4] {
        [
            ("Failed",             self.failed.len()),
            ("Predictive failure", self.predictive_failure.len()),
            ("Not in use",         self.not_in_use.len()),
            ("Rebuilding",         self.rebuilding.len()),
        ]
    }
}
