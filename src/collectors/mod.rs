pub mod hinv;
pub mod hwdisk;
pub mod monitor;
pub mod omreport;
pub mod remote;

use crate::classify;
use crate::config::RemoteConfig;
use crate::error::{FetchError, FetchResult};
use crate::models::classification::ClassificationResult;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Where the live controller report comes from.
pub trait DiskSource {
    fn fetch(&mut self) -> FetchResult<String>;
}

/// Controller report pulled from the host over ssh.
pub struct RemoteSource {
    pub host:   String,
    pub config: RemoteConfig,
}

impl DiskSource for RemoteSource {
    fn fetch(&mut self) -> FetchResult<String> {
        remote::query(&self.config, &self.host)
    }
}

/// Controller report saved to a file (offline analysis).
pub struct FileSource(pub PathBuf);

impl DiskSource for FileSource {
    fn fetch(&mut self) -> FetchResult<String> {
        let text = fs::read_to_string(&self.0)?;
        if text.trim().is_empty() {
            return Err(FetchError::Empty { stderr: format!("{} is empty", self.0.display()) });
        }
        Ok(text)
    }
}

/// One fetch → extract → classify cycle.
///
/// A failed fetch never reaches the classifier: the cycle is reported as
/// unreachable with every list empty.
pub fn poll_cycle(source: &mut dyn DiskSource) -> ClassificationResult {
    match source.fetch() {
        Ok(text) => classify::classify(&omreport::extract_disks(&text)),
        Err(e) => {
            warn!(error = %e, "controller report unavailable, marking cycle unreachable");
            ClassificationResult::unreachable()
        }
    }
}
