use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by device queries, filesystem mutations and transfers.
#[derive(Debug, Error)]
pub enum AdbxError {
    #[error("No devices found. Connect a device and authorize USB debugging.")]
    NoDeviceFound,

    #[error("No device found matching ID: {0}")]
    DeviceNotFound(String),

    #[error("Multiple devices match the given ID")]
    MultipleDevicesFound,

    #[error("Multiple devices connected; a device ID is required")]
    DeviceIdRequired,

    #[error("adb executable not found or not executable: {}", .0.display())]
    ToolNotFound(PathBuf),

    #[error("Cannot list {path} (exit code {exit_code}): {diagnostic}")]
    RemoteListError {
        path: String,
        exit_code: i32,
        diagnostic: String,
    },

    #[error("Cannot stat {path}: {detail}")]
    StatError { path: String, detail: String },

    #[error("Cannot determine size of {path}: {detail}")]
    SizeUnavailable { path: String, detail: String },

    #[error("Transfer failed with exit code {exit_code}: {diagnostic}")]
    TransferFailed { exit_code: i32, diagnostic: String },

    #[error("`{command}` failed with exit code {exit_code}: {diagnostic}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        diagnostic: String,
    },

    #[error("`{command}` timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("Transfer cancelled")]
    Cancelled,

    #[error("Another transfer is already running")]
    TransferInProgress,

    #[error("{path} is outside of the browsing root {root}")]
    OutsideRoot { path: String, root: String },

    #[error("Invalid remote path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl AdbxError {
    /// Whether the error means the bridge tool itself is unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AdbxError::ToolNotFound(_))
    }
}

impl From<String> for AdbxError {
    fn from(s: String) -> Self {
        AdbxError::Other(s)
    }
}

impl From<&str> for AdbxError {
    fn from(s: &str) -> Self {
        AdbxError::Other(s.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdbxError>;
