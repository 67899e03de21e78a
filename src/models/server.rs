use crate::models::classification::ClassificationResult;
use crate::models::disk::{ControllerSelfTest, ServerInventory};
use serde::Serialize;

/// Everything known about one host after a single collection pass.
///
/// Each host gets its own snapshot; nothing here is shared between hosts
/// or carried into the next poll.
#[derive(Debug, Clone, Serialize)]
pub struct ServerSnapshot {
    pub host:      String,
    pub cluster:   String,
    pub inventory: ServerInventory,
    pub self_test: ControllerSelfTest,
    /// Cleaned disk health log, quoted verbatim in tickets.
    #[serde(skip)]
    pub self_test_log: String,
    pub disks:     ClassificationResult,
}
