use crate::models::classification::ClassificationResult;
use crate::models::disk::{DiskRecord, DiskState};
use tracing::debug;

/// Sort disks into operational categories.
///
/// Each disk lands in at most one of not-in-use / rebuilding / failed, checked
/// in that order; any state other than Online, Ready or Rebuilding counts as
/// failed. Predictive failure is only considered for disks that are Online.
/// Only failed disks are slated for replacement.
///
/// Pure function of its input: the same slice always yields the same result.
pub fn classify(disks: &[DiskRecord]) -> ClassificationResult {
    let mut out = ClassificationResult {
        all:       disks.to_vec(),
        reachable: true,
        ..ClassificationResult::default()
    };

    for disk in disks {
        match &disk.state {
            DiskState::Ready      => out.not_in_use.push(disk.clone()),
            DiskState::Rebuilding => out.rebuilding.push(disk.clone()),
            DiskState::Other(_)   => {
                out.failed.push(disk.clone());
                out.needs_replacement.push(disk.clone());
            }
            DiskState::Online => {
                if disk.failure_predicted {
                    out.predictive_failure.push(disk.clone());
                }
            }
        }
    }

    debug!(
        total      = out.all.len(),
        failed     = out.failed.len(),
        predictive = out.predictive_failure.len(),
        not_in_use = out.not_in_use.len(),
        rebuilding = out.rebuilding.len(),
        "classified disks"
    );
    out
}
