//! Parsers for the plain-text output of `adb devices`, `ls -p` and `stat -c %s`.

use crate::core::path::SEPARATOR;
use crate::core::types::{Device, DeviceState, RemoteEntry};
use log::debug;

const DEVICES_HEADER: &str = "List of devices attached";

/// Parse `adb devices` output into every listed device, whatever its state.
///
/// Lines are `<serial> <status>` separated by a tab or whitespace. The header
/// and daemon chatter (`* daemon started successfully`) are skipped.
pub fn parse_devices(output: &str) -> Vec<Device> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with(DEVICES_HEADER) && !line.starts_with('*'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let serial = fields.next()?;
            let status = fields.next()?;
            Some(Device::new(serial).with_state(DeviceState::parse(status)))
        })
        .collect()
}

/// Devices from `adb devices` output whose status is exactly `device`,
/// in their original order
pub fn parse_available_devices(output: &str) -> Vec<Device> {
    parse_devices(output)
        .into_iter()
        .filter(|d| {
            if !d.is_available() {
                debug!("Skipping {} ({})", d.id, d.state);
            }
            d.is_available()
        })
        .collect()
}

/// Parse `ls -p` output. A trailing separator marks a directory and is
/// stripped from the name; every other line is a file.
pub fn parse_listing(output: &str) -> Vec<RemoteEntry> {
    output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.strip_suffix(SEPARATOR) {
            Some(name) => RemoteEntry::directory(name),
            None => RemoteEntry::file(line),
        })
        .collect()
}

/// Parse `stat -c %s` output into a byte count
pub fn parse_size(output: &str) -> Option<u64> {
    output.trim().parse::<u64>().ok()
}
