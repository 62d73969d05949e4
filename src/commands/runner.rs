use crate::cli::Commands;
use crate::commands::{
    browse::BrowseCommand, cp::CpCommand, devices::DevicesCommand, ls::LsCommand,
    mkdir::MkdirCommand, mv::MvCommand, pull::PullCommand, push::PushCommand, rm::RmCommand,
    stat::StatCommand, tree::TreeCommand, SubCommand,
};
use crate::core::context::CommandContext;
use crate::error::Result;
use log::debug;

/// Command runner that handles routing and execution
pub struct CommandRunner {
    ctx: CommandContext,
}

impl CommandRunner {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    /// Run one parsed command
    pub async fn run(&self, command: Commands) -> Result<()> {
        debug!("CommandRunner::run() called with command: {:?}", command);
        let ctx = &self.ctx;

        match command {
            Commands::Devices(args) => DevicesCommand::new().run(ctx, args).await,
            Commands::Ls(args) => LsCommand::new().run(ctx, args).await,
            Commands::Tree(args) => TreeCommand::new().run(ctx, args).await,
            Commands::Mkdir(args) => MkdirCommand::new().run(ctx, args).await,
            Commands::Rm(args) => RmCommand::new().run(ctx, args).await,
            Commands::Cp(args) => CpCommand::new().run(ctx, args).await,
            Commands::Mv(args) => MvCommand::new().run(ctx, args).await,
            Commands::Stat(args) => StatCommand::new().run(ctx, args).await,
            Commands::Push(args) => PushCommand::new().run(ctx, args).await,
            Commands::Pull(args) => PullCommand::new().run(ctx, args).await,
            Commands::Browse(args) => BrowseCommand::new().run(ctx, args).await,
        }
    }
}
