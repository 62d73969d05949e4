use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::error::Result;
use crate::output::SizeInfo;
use async_trait::async_trait;

pub struct StatCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct StatArgs {
    /// Remote files
    #[clap(required = true)]
    pub paths: Vec<String>,
}

impl StatCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for StatCommand {
    type Args = StatArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let session = ctx.open_session().await?;

        let mut sizes = Vec::with_capacity(args.paths.len());
        for raw in &args.paths {
            let path = session.resolve(raw);
            let size = session.stat_size(&path).await?;
            sizes.push(SizeInfo { path, size });
        }

        ctx.formatter().render(ctx.output_format, &sizes)
    }
}
