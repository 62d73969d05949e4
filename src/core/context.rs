use crate::adb::Bridge;
use crate::config::Settings;
use crate::core::types::OutputFormat;
use crate::device::{DeviceManager, DeviceSession};
use crate::error::Result;
use crate::output::OutputFormatter;
use crate::progress::ProgressFactory;

/// Shared context for all commands
#[derive(Clone)]
pub struct CommandContext {
    pub bridge: Bridge,
    pub settings: Settings,
    pub output_format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    pub fn device_manager(&self) -> DeviceManager {
        DeviceManager::new(self.bridge.clone())
    }

    /// Select the target device and open a session rooted at the configured root
    pub async fn open_session(&self) -> Result<DeviceSession> {
        let session = DeviceSession::open(
            self.bridge.clone(),
            self.settings.device.as_deref(),
            self.settings.root.clone(),
        )
        .await?;
        Ok(session.with_transfer_timeout(self.settings.transfer_timeout))
    }

    pub fn formatter(&self) -> OutputFormatter {
        OutputFormatter::new(self.quiet)
    }

    /// Check if progress/status messages should be shown
    /// Returns false if quiet mode is enabled or output format is JSON
    pub fn should_show_progress(&self) -> bool {
        !self.quiet && self.output_format != OutputFormat::Json
    }

    pub fn progress(&self) -> ProgressFactory {
        ProgressFactory::new(self.should_show_progress())
    }
}

/// Builder for creating command contexts
pub struct CommandContextBuilder {
    bridge: Bridge,
    settings: Settings,
    output_format: OutputFormat,
    quiet: bool,
}

impl CommandContextBuilder {
    pub fn new(bridge: Bridge, settings: Settings) -> Self {
        Self {
            bridge,
            settings,
            output_format: OutputFormat::Table,
            quiet: false,
        }
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn build(self) -> CommandContext {
        CommandContext {
            bridge: self.bridge,
            settings: self.settings,
            output_format: self.output_format,
            quiet: self.quiet,
        }
    }
}
