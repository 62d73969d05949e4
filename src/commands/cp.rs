use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;

pub struct CpCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct CpArgs {
    /// Remote source
    pub src: String,

    /// Remote destination
    pub dst: String,
}

impl CpCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for CpCommand {
    type Args = CpArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let session = ctx.open_session().await?;
        let src = session.resolve(&args.src);
        let dst = session.resolve(&args.dst);

        session.copy(&src, &dst).await?;
        ctx.formatter().success(&format!("Copied {} to {}", src, dst))
    }
}
