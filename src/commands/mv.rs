use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;

pub struct MvCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct MvArgs {
    /// Remote source
    pub src: String,

    /// Remote destination
    pub dst: String,
}

impl MvCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for MvCommand {
    type Args = MvArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let session = ctx.open_session().await?;
        let src = session.resolve(&args.src);
        let dst = session.resolve(&args.dst);

        session.move_path(&src, &dst).await?;
        ctx.formatter().success(&format!("Moved {} to {}", src, dst))
    }
}
