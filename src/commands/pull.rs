use crate::commands::transfer::{plan_pull, report, run_batch, skip_existing};
use crate::commands::SubCommand;
use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct PullCommand;

#[derive(Debug, Clone, clap::Args)]
pub struct PullArgs {
    /// Remote file(s) to pull, followed by the local directory when more
    /// than one path is given (defaults to the working directory)
    #[clap(required = true)]
    pub paths: Vec<String>,

    /// Overwrite local files that already exist
    #[clap(short, long)]
    pub force: bool,
}

impl PullArgs {
    /// Remote sources and the local directory
    pub fn split(&self) -> (&[String], PathBuf) {
        match self.paths.split_last() {
            Some((last, rest)) if !rest.is_empty() => (rest, PathBuf::from(last)),
            _ => (self.paths.as_slice(), PathBuf::from(".")),
        }
    }
}

impl PullCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for PullCommand {
    type Args = PullArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let (remotes, local_dir) = args.split();
        let session = ctx.open_session().await?;
        let remotes: Vec<_> = remotes.iter().map(|r| session.resolve(r)).collect();

        tokio::fs::create_dir_all(&local_dir).await?;
        let jobs = plan_pull(&remotes, &local_dir)?;
        let (jobs, skipped) = skip_existing(&session, jobs, args.force).await?;
        let summary = run_batch(ctx, &session, jobs).await;
        report(ctx, &summary, skipped)
    }
}
