use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::core::types::OutputFormat;
use crate::error::Result;
use crate::output::render_tree;
use async_trait::async_trait;

pub struct TreeCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct TreeArgs {
    /// Remote directory, absolute or relative to the root
    pub path: Option<String>,

    /// Number of directory levels to descend
    #[clap(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    pub depth: u32,
}

impl TreeCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for TreeCommand {
    type Args = TreeArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let session = ctx.open_session().await?;
        let path = match args.path.as_deref() {
            Some(p) => session.resolve(p),
            None => session.current_path().clone(),
        };

        let spinner = ctx.progress().command(&format!("Reading {}", path));
        let tree = match session.list_tree(&path, args.depth as usize).await {
            Ok(tree) => {
                spinner.finish(&format!("Read {}", path));
                tree
            }
            Err(e) => {
                spinner.abandon("Failed");
                return Err(e);
            }
        };

        let formatter = ctx.formatter();
        match ctx.output_format {
            OutputFormat::Json => formatter.json(&tree),
            _ => formatter.message(&render_tree(&tree).join("\n")),
        }
    }
}
