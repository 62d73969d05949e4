use crate::adb::parse::parse_available_devices;
use crate::adb::Bridge;
use crate::core::types::Device;
use crate::error::{AdbxError, Result};
use log::debug;

/// Unified device discovery and selection
#[derive(Clone)]
pub struct DeviceManager {
    bridge: Bridge,
}

impl DeviceManager {
    pub fn new(bridge: Bridge) -> Self {
        Self { bridge }
    }

    /// Devices whose status is `device`, in the order `adb devices` lists them.
    ///
    /// Unauthorized and offline devices are left out. An empty result is
    /// `NoDeviceFound`.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let output = self.bridge.devices().await?;
        if !output.success() {
            return Err(AdbxError::CommandFailed {
                command: "adb devices".to_string(),
                exit_code: output.exit_code,
                diagnostic: output.diagnostic(),
            });
        }

        let devices = parse_available_devices(&output.stdout);
        debug!("Found {} available devices", devices.len());

        if devices.is_empty() {
            return Err(AdbxError::NoDeviceFound);
        }
        Ok(devices)
    }

    /// Find a device by partial ID match
    pub async fn find_device(&self, partial_id: &str) -> Result<Device> {
        let devices = self.list_devices().await?;
        select_from(devices, Some(partial_id))
    }

    /// Get target device - uses device_id if provided, otherwise requires single device
    pub async fn get_target_device(&self, device_id: Option<&str>) -> Result<Device> {
        let devices = self.list_devices().await?;
        select_from(devices, device_id)
    }
}

/// Pick a device from a non-empty list.
///
/// With a selector, an exact ID match wins, then a unique case-insensitive
/// substring match. Without one, the list must hold exactly one device.
pub fn select_from(devices: Vec<Device>, selector: Option<&str>) -> Result<Device> {
    let Some(partial_id) = selector else {
        let mut iter = devices.into_iter();
        return match (iter.next(), iter.next()) {
            (None, _) => Err(AdbxError::NoDeviceFound),
            (Some(device), None) => Ok(device),
            (Some(_), Some(_)) => Err(AdbxError::DeviceIdRequired),
        };
    };

    if let Some(exact) = devices.iter().find(|d| d.id.as_str() == partial_id) {
        return Ok(exact.clone());
    }

    let needle = partial_id.to_lowercase();
    let mut matches: Vec<Device> = devices
        .into_iter()
        .filter(|d| d.id.as_str().to_lowercase().contains(&needle))
        .collect();

    match matches.len() {
        0 => Err(AdbxError::DeviceNotFound(partial_id.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(AdbxError::MultipleDevicesFound),
    }
}
