use crate::core::path::RemotePath;
use crate::core::types::RemoteEntry;
use crate::device::TreeNode;
use crate::output::{PlainFormat, TableFormat};
use crate::transfer::{BatchSummary, TransferJob};
use serde::Serialize;

/// Format size in human-readable format
pub fn format_size(size: u64) -> String {
    const UNITS: &[&str] = &["B", "K", "M", "G", "T"];

    let mut value = size as f64;
    let mut unit_index = 0;

    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{}{}", size, UNITS[unit_index])
    } else {
        format!("{:.1}{}", value, UNITS[unit_index])
    }
}

impl TableFormat for RemoteEntry {
    fn headers() -> Vec<&'static str> {
        vec!["NAME", "TYPE"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.kind.to_string()]
    }
}

impl PlainFormat for RemoteEntry {
    fn plain(&self) -> String {
        if self.is_dir() {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Size of one remote file, as reported by `stat`
#[derive(Debug, Clone, Serialize)]
pub struct SizeInfo {
    pub path: RemotePath,
    pub size: u64,
}

impl TableFormat for SizeInfo {
    fn headers() -> Vec<&'static str> {
        vec!["PATH", "SIZE", "BYTES"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.path.to_string(), format_size(self.size), self.size.to_string()]
    }
}

impl PlainFormat for SizeInfo {
    fn plain(&self) -> String {
        format!("{}\t{}", self.size, self.path)
    }
}

/// Draw a directory tree with box characters, one line per directory
pub fn render_tree(root: &TreeNode) -> Vec<String> {
    let mut lines = vec![root.path.dir_string()];
    render_children(&root.children, "", &mut lines);
    lines
}

fn render_children(children: &[TreeNode], prefix: &str, lines: &mut Vec<String>) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        let suffix = if child.readable { "" } else { " (unreadable)" };
        lines.push(format!("{}{}{}/{}", prefix, branch, child.name, suffix));

        let next = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(&child.children, &next, lines);
    }
}

/// Outcome of one job in a push/pull batch
#[derive(Debug, Clone, Serialize)]
pub struct TransferRecord {
    pub direction: String,
    pub source: String,
    pub destination: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransferRecord {
    fn new(job: &TransferJob, status: &str, error: Option<String>) -> Self {
        Self {
            direction: job.direction.to_string(),
            source: job.source(),
            destination: job.destination(),
            status: status.to_string(),
            error,
        }
    }

    pub fn skipped(job: &TransferJob) -> Self {
        Self::new(job, "skipped", Some("destination exists (use --force)".to_string()))
    }

    pub fn from_summary(summary: &BatchSummary) -> Vec<Self> {
        summary
            .completed
            .iter()
            .map(|job| Self::new(job, "ok", None))
            .chain(
                summary
                    .failed
                    .iter()
                    .map(|f| Self::new(&f.job, "failed", Some(f.error.clone()))),
            )
            .collect()
    }
}

impl TableFormat for TransferRecord {
    fn headers() -> Vec<&'static str> {
        vec!["DIRECTION", "SOURCE", "DESTINATION", "STATUS", "ERROR"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.direction.clone(),
            self.source.clone(),
            self.destination.clone(),
            self.status.clone(),
            self.error.clone().unwrap_or_default(),
        ]
    }
}

impl PlainFormat for TransferRecord {
    fn plain(&self) -> String {
        match &self.error {
            Some(e) => format!("{}\t{} -> {}\t{}", self.status, self.source, self.destination, e),
            None => format!("{}\t{} -> {}", self.status, self.source, self.destination),
        }
    }
}
