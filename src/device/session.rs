use crate::adb::Bridge;
use crate::core::path::{Navigator, RemotePath};
use crate::core::types::Device;
use crate::device::manager::DeviceManager;
use crate::device::remote::{Listing, RemoteFs, TreeNode};
use crate::error::Result;
use crate::transfer::{CancelToken, TransferGate, TransferHandle, TransferJob, TransferQueue, TransferTask};
use log::*;
use std::time::Duration;

/// Everything a front end needs to work with one device: the selected
/// device, the current remote directory and the transfer slot.
///
/// Failed operations leave the current path and device untouched.
pub struct DeviceSession {
    device: Device,
    remote: RemoteFs,
    navigator: Navigator,
    gate: TransferGate,
    transfer_timeout: Option<Duration>,
}

impl DeviceSession {
    pub fn new(bridge: Bridge, device: Device, root: RemotePath) -> Self {
        info!("Session on {} rooted at {}", device.id, root);
        Self {
            remote: RemoteFs::new(bridge, device.id.clone()),
            device,
            navigator: Navigator::new(root),
            gate: TransferGate::new(),
            transfer_timeout: None,
        }
    }

    /// Select a device (by partial ID, or the only one connected) and open a session
    pub async fn open(bridge: Bridge, selector: Option<&str>, root: RemotePath) -> Result<Self> {
        let device = DeviceManager::new(bridge.clone())
            .get_target_device(selector)
            .await?;
        Ok(Self::new(bridge, device, root))
    }

    pub fn with_transfer_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.transfer_timeout = timeout;
        self
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn remote(&self) -> &RemoteFs {
        &self.remote
    }

    pub fn root(&self) -> &RemotePath {
        self.navigator.root()
    }

    pub fn current_path(&self) -> &RemotePath {
        self.navigator.current()
    }

    /// Resolve a name or path against the current directory
    pub fn resolve(&self, input: &str) -> RemotePath {
        self.navigator.resolve(input)
    }

    /// Devices currently available through this session's bridge
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        DeviceManager::new(self.remote.bridge().clone()).list_devices().await
    }

    pub async fn list_directory(&self, path: &RemotePath) -> Result<Listing> {
        self.remote.list_directory(path).await
    }

    /// List the current directory
    pub async fn refresh(&self) -> Result<Listing> {
        self.remote.list_directory(self.navigator.current()).await
    }

    /// Whether a listing still describes the current directory
    pub fn is_current(&self, listing: &Listing) -> bool {
        &listing.path == self.navigator.current()
    }

    /// Enter a directory (relative or absolute) and list it.
    ///
    /// The move only happens if the listing succeeds, so an unreadable or
    /// missing directory leaves the session where it was.
    pub async fn change_directory(&mut self, input: &str) -> Result<Listing> {
        let mut target = self.navigator.clone();
        target.go_to(input)?;
        let listing = self.remote.list_directory(target.current()).await?;
        self.navigator = target;
        Ok(listing)
    }

    /// Go to the parent directory; a no-op at the root
    pub fn go_up(&mut self) -> bool {
        self.navigator.go_up()
    }

    pub async fn make_directory(&self, path: &RemotePath) -> Result<()> {
        self.remote.make_directory(path).await
    }

    pub async fn remove_recursive(&self, path: &RemotePath) -> Result<()> {
        self.remote.remove_recursive(path).await
    }

    pub async fn copy(&self, src: &RemotePath, dst: &RemotePath) -> Result<()> {
        self.remote.copy(src, dst).await
    }

    pub async fn move_path(&self, src: &RemotePath, dst: &RemotePath) -> Result<()> {
        self.remote.move_path(src.as_str(), dst.as_str()).await
    }

    pub async fn stat_size(&self, path: &RemotePath) -> Result<u64> {
        self.remote.stat_size(path).await
    }

    pub async fn exists(&self, path: &RemotePath) -> Result<bool> {
        self.remote.exists(path).await
    }

    pub async fn list_tree(&self, path: &RemotePath, depth: usize) -> Result<TreeNode> {
        self.remote.list_tree(path, depth).await
    }

    /// True while a transfer started from this session is running
    pub fn is_transferring(&self) -> bool {
        self.gate.is_busy()
    }

    /// Start one transfer in the background.
    ///
    /// Fails with `TransferInProgress` if another transfer is still running.
    pub fn start_transfer(&self, job: TransferJob) -> Result<TransferHandle> {
        let permit = self.gate.try_acquire()?;
        Ok(TransferTask::new(self.remote.clone(), job)
            .with_timeout(self.transfer_timeout)
            .spawn(permit, CancelToken::new()))
    }

    /// Empty sequential queue sharing this session's transfer slot
    pub fn transfer_queue(&self) -> TransferQueue {
        TransferQueue::new(self.remote.clone(), self.gate.clone()).with_timeout(self.transfer_timeout)
    }
}
