use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;
use log::debug;

pub struct DevicesCommand;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct DevicesArgs {}

impl DevicesCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for DevicesCommand {
    type Args = DevicesArgs;

    async fn run(&self, ctx: &CommandContext, _args: Self::Args) -> Result<()> {
        let devices = ctx.device_manager().list_devices().await?;
        debug!("Found {} available devices", devices.len());
        ctx.formatter().render(ctx.output_format, &devices)
    }
}
