use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;

pub struct MkdirCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct MkdirArgs {
    /// Remote directory to create; missing parents are created too
    #[clap(required = true)]
    pub paths: Vec<String>,
}

impl MkdirCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for MkdirCommand {
    type Args = MkdirArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let session = ctx.open_session().await?;
        for raw in &args.paths {
            let path = session.resolve(raw);
            session.make_directory(&path).await?;
            ctx.formatter().success(&format!("Created {}", path))?;
        }
        Ok(())
    }
}
