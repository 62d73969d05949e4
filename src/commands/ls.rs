use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::core::types::OutputFormat;
use crate::error::Result;
use async_trait::async_trait;

pub struct LsCommand;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct LsArgs {
    /// Remote directory, absolute or relative to the root
    pub path: Option<String>,
}

impl LsCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for LsCommand {
    type Args = LsArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let session = ctx.open_session().await?;
        let path = match args.path.as_deref() {
            Some(p) => session.resolve(p),
            None => session.current_path().clone(),
        };

        let listing = session.list_directory(&path).await?;
        let formatter = ctx.formatter();
        match ctx.output_format {
            OutputFormat::Json => formatter.json(&listing),
            format => formatter.render(format, &listing.entries),
        }
    }
}
