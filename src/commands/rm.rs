use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::error::{AdbxError, Result};
use async_trait::async_trait;

pub struct RmCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct RmArgs {
    /// Remote files or directories to remove
    #[clap(required = true)]
    pub paths: Vec<String>,
}

impl RmCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for RmCommand {
    type Args = RmArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let session = ctx.open_session().await?;
        let formatter = ctx.formatter();

        for raw in &args.paths {
            let path = session.resolve(raw);
            // Never the filesystem root or the browsing root
            if path.is_root() || &path == session.root() {
                return Err(AdbxError::InvalidPath(format!("refusing to remove {}", path)));
            }
            session.remove_recursive(&path).await?;
            formatter.success(&format!("Removed {}", path))?;
        }
        Ok(())
    }
}
