use crate::commands::transfer::{plan_push, report, run_batch, skip_existing};
use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;

pub struct PushCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct PushArgs {
    /// Local file(s) to push, followed by the remote directory when more
    /// than one path is given (defaults to the root)
    #[clap(required = true)]
    pub paths: Vec<String>,

    /// Recursive push (for directories)
    #[clap(short, long)]
    pub recursive: bool,

    /// Overwrite files that already exist on the device
    #[clap(short, long)]
    pub force: bool,
}

impl PushArgs {
    /// Local sources and the optional remote directory
    pub fn split(&self) -> (Vec<PathBuf>, Option<&str>) {
        match self.paths.split_last() {
            Some((last, rest)) if !rest.is_empty() => {
                (rest.iter().map(PathBuf::from).collect(), Some(last.as_str()))
            }
            _ => (self.paths.iter().map(PathBuf::from).collect(), None),
        }
    }
}

impl PushCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for PushCommand {
    type Args = PushArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let (locals, remote_dir) = args.split();
        let session = ctx.open_session().await?;
        let remote_dir = match remote_dir {
            Some(dir) => session.resolve(dir),
            None => session.current_path().clone(),
        };

        let plan = plan_push(&locals, &remote_dir, args.recursive)?;
        for dir in &plan.directories {
            debug!("Creating remote directory {}", dir);
            session.make_directory(dir).await?;
        }

        let (jobs, skipped) = skip_existing(&session, plan.jobs, args.force).await?;
        let summary = run_batch(ctx, &session, jobs).await;
        report(ctx, &summary, skipped)
    }
}
