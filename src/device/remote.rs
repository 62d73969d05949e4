use crate::adb::parse::{parse_listing, parse_size};
use crate::adb::{Bridge, ShellCommand};
use crate::core::path::RemotePath;
use crate::core::types::{DeviceId, RemoteEntry};
use crate::error::{AdbxError, Result};
use log::*;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

/// Directory listing tagged with the path it was requested for
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub path: RemotePath,
    pub entries: Vec<RemoteEntry>,
}

impl Listing {
    pub fn directories(&self) -> impl Iterator<Item = &RemoteEntry> {
        self.entries.iter().filter(|e| e.is_dir())
    }
}

/// Directory tree node, directories only
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub path: RemotePath,
    /// `false` when listing this directory failed (usually permission denied)
    pub readable: bool,
    pub children: Vec<TreeNode>,
}

/// Stateless filesystem operations on one device.
///
/// Each operation is a single `adb -s <serial> shell ...` invocation with
/// quoted operands. Mutations only observe the exit code.
#[derive(Clone)]
pub struct RemoteFs {
    bridge: Bridge,
    serial: DeviceId,
}

impl RemoteFs {
    pub fn new(bridge: Bridge, serial: DeviceId) -> Self {
        Self { bridge, serial }
    }

    pub fn serial(&self) -> &DeviceId {
        &self.serial
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    async fn exec(&self, cmd: ShellCommand) -> Result<()> {
        let output = self.bridge.shell(&self.serial, &cmd).await?;
        if output.success() {
            Ok(())
        } else {
            Err(AdbxError::CommandFailed {
                command: cmd.to_command_line(),
                exit_code: output.exit_code,
                diagnostic: output.diagnostic(),
            })
        }
    }

    /// `ls -p <path>`
    pub async fn list_directory(&self, path: &RemotePath) -> Result<Listing> {
        // Trailing separator so a symlinked directory such as /sdcard is followed
        let cmd = ShellCommand::new("ls").flag("-p").arg(&path.dir_string());
        let output = self.bridge.shell(&self.serial, &cmd).await?;

        if !output.success() {
            return Err(AdbxError::RemoteListError {
                path: path.to_string(),
                exit_code: output.exit_code,
                diagnostic: output.diagnostic(),
            });
        }

        let entries = parse_listing(&output.stdout);
        debug!("Listed {} entries in {}", entries.len(), path);
        Ok(Listing {
            path: path.clone(),
            entries,
        })
    }

    /// `mkdir -p <path>`
    pub async fn make_directory(&self, path: &RemotePath) -> Result<()> {
        info!("mkdir {}", path);
        self.exec(ShellCommand::new("mkdir").flag("-p").path(path)).await
    }

    /// `rm -rf <path>`
    pub async fn remove_recursive(&self, path: &RemotePath) -> Result<()> {
        info!("rm -rf {}", path);
        self.exec(ShellCommand::new("rm").flag("-rf").path(path)).await
    }

    /// `rm -f <path>`
    pub async fn remove_file(&self, path: &str) -> Result<()> {
        self.exec(ShellCommand::new("rm").flag("-f").arg(path)).await
    }

    /// `cp -r <src> <dst>`
    pub async fn copy(&self, src: &RemotePath, dst: &RemotePath) -> Result<()> {
        info!("cp -r {} {}", src, dst);
        self.exec(ShellCommand::new("cp").flag("-r").path(src).path(dst)).await
    }

    /// `mv <src> <dst>`
    pub async fn move_path(&self, src: &str, dst: &str) -> Result<()> {
        info!("mv {} {}", src, dst);
        self.exec(ShellCommand::new("mv").arg(src).arg(dst)).await
    }

    /// `stat -c %s <path>`
    pub async fn stat_size(&self, path: &RemotePath) -> Result<u64> {
        let cmd = ShellCommand::new("stat").flag("-c").flag("%s").path(path);
        let output = self.bridge.shell(&self.serial, &cmd).await?;

        if !output.success() {
            return Err(AdbxError::StatError {
                path: path.to_string(),
                detail: output.diagnostic(),
            });
        }

        parse_size(&output.stdout).ok_or_else(|| AdbxError::StatError {
            path: path.to_string(),
            detail: format!("unexpected stat output: {:?}", output.stdout.trim()),
        })
    }

    /// `test -e <path>`
    pub async fn exists(&self, path: &RemotePath) -> Result<bool> {
        let cmd = ShellCommand::new("test").flag("-e").path(path);
        let output = self.bridge.shell(&self.serial, &cmd).await?;
        match output.exit_code {
            0 => Ok(true),
            1 => Ok(false),
            code => Err(AdbxError::CommandFailed {
                command: cmd.to_command_line(),
                exit_code: code,
                diagnostic: output.diagnostic(),
            }),
        }
    }

    /// Directory tree under `path`, `depth` levels deep (at least one).
    ///
    /// Failure to list `path` itself is an error; unreadable subdirectories
    /// become leaves marked unreadable.
    pub async fn list_tree(&self, path: &RemotePath, depth: usize) -> Result<TreeNode> {
        let listing = self.list_directory(path).await?;
        let mut children = Vec::new();
        for dir in listing.directories() {
            children.push(self.subtree(path.join(&dir.name), depth.saturating_sub(1)).await);
        }
        Ok(TreeNode {
            name: path.name().unwrap_or("/").to_string(),
            path: path.clone(),
            readable: true,
            children,
        })
    }

    fn subtree<'a>(
        &'a self,
        path: RemotePath,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = TreeNode> + Send + 'a>> {
        Box::pin(async move {
            let name = path.name().unwrap_or("/").to_string();
            if depth == 0 {
                return TreeNode {
                    name,
                    path,
                    readable: true,
                    children: Vec::new(),
                };
            }

            match self.list_directory(&path).await {
                Ok(listing) => {
                    let mut children = Vec::new();
                    for dir in listing.directories() {
                        children.push(self.subtree(path.join(&dir.name), depth - 1).await);
                    }
                    TreeNode {
                        name,
                        path,
                        readable: true,
                        children,
                    }
                }
                Err(e) => {
                    if e.is_fatal() {
                        warn!("{}", e);
                    } else {
                        debug!("Cannot expand {}: {}", path, e);
                    }
                    TreeNode {
                        name,
                        path,
                        readable: false,
                        children: Vec::new(),
                    }
                }
            }
        })
    }
}
