use crate::adb::Bridge;
use crate::config::{Config, Overrides, Settings};
use crate::core::context::{CommandContext, CommandContextBuilder};
use crate::core::path::RemotePath;
use crate::core::types::{Device, DeviceState};
use crate::device::DeviceSession;
use crate::testing::mocks::ScriptedRunner;
use std::sync::Arc;

/// `adb devices` output with the daemon start-up chatter and mixed states
pub const DEVICES_MIXED: &str = "\
* daemon not running; starting now at tcp:5037
* daemon started successfully
List of devices attached
emulator-5554\tdevice
0123456789ABCDEF\tunauthorized
192.168.1.100:5555\tdevice
HT7A1B2C3D4\toffline
R58M123ABC\tdevice
";

pub const DEVICES_SINGLE: &str = "List of devices attached\nABC123\tdevice\n\n";

pub const DEVICES_NONE: &str = "List of devices attached\n\n";

/// `ls -p /sdcard` output
pub const LISTING_SDCARD: &str = "\
Alarms/
DCIM/
Download/
Music/
notes with spaces.txt
photo.jpg
backup.tar.gz
";

pub fn test_device(id: &str) -> Device {
    Device::new(id).with_state(DeviceState::Device)
}

/// A session on device `ABC123` rooted at `/sdcard`, backed by `runner`
pub fn test_session(runner: Arc<ScriptedRunner>) -> DeviceSession {
    let bridge = Bridge::new(runner);
    DeviceSession::new(bridge, test_device("ABC123"), sdcard())
}

pub fn sdcard() -> RemotePath {
    RemotePath::new("/sdcard").unwrap()
}

/// Settings pinned to device `ABC123` with default root and timeouts
pub fn test_settings() -> Settings {
    let overrides = Overrides {
        device: Some("ABC123".to_string()),
        ..Overrides::default()
    };
    Settings::resolve_with_env(&Config::default(), &overrides, None).unwrap()
}

/// A quiet command context backed by `runner`
pub fn test_context(runner: Arc<ScriptedRunner>) -> CommandContext {
    CommandContextBuilder::new(Bridge::new(runner), test_settings())
        .quiet(true)
        .build()
}
