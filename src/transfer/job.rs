use crate::core::path::RemotePath;
use crate::core::types::TransferDirection;
use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Suffix of the temporary destination written during a transfer
pub const PARTIAL_SUFFIX: &str = ".adbx-part";

/// One push or pull between a local path and a remote path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferJob {
    pub direction: TransferDirection,
    pub local: PathBuf,
    pub remote: RemotePath,
}

impl TransferJob {
    pub fn push(local: impl Into<PathBuf>, remote: RemotePath) -> Self {
        Self {
            direction: TransferDirection::Push,
            local: local.into(),
            remote,
        }
    }

    pub fn pull(remote: RemotePath, local: impl Into<PathBuf>) -> Self {
        Self {
            direction: TransferDirection::Pull,
            local: local.into(),
            remote,
        }
    }

    pub fn source(&self) -> String {
        match self.direction {
            TransferDirection::Push => self.local.display().to_string(),
            TransferDirection::Pull => self.remote.to_string(),
        }
    }

    pub fn destination(&self) -> String {
        match self.direction {
            TransferDirection::Push => self.remote.to_string(),
            TransferDirection::Pull => self.local.display().to_string(),
        }
    }

    /// Remote path the bridge writes to before the final `mv`
    pub fn partial_remote(&self) -> String {
        format!("{}{}", self.remote, PARTIAL_SUFFIX)
    }

    /// Local path the bridge writes to before the final rename
    pub fn partial_local(&self) -> PathBuf {
        let mut name = OsString::from(self.local.as_os_str());
        name.push(PARTIAL_SUFFIX);
        PathBuf::from(name)
    }

    /// Short name for progress display
    pub fn display_name(&self) -> String {
        match self.direction {
            TransferDirection::Push => self
                .local
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| self.source()),
            TransferDirection::Pull => self
                .remote
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| self.source()),
        }
    }
}

impl fmt::Display for TransferJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.direction, self.source(), self.destination())
    }
}
