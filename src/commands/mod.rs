use crate::core::context::CommandContext;
use crate::error::Result;
use async_trait::async_trait;

/// Base trait for all subcommands
#[async_trait]
pub trait SubCommand {
    type Args;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()>;
}

pub mod runner;
pub mod transfer;

pub mod browse;
pub mod cp;
pub mod devices;
pub mod ls;
pub mod mkdir;
pub mod mv;
pub mod pull;
pub mod push;
pub mod rm;
pub mod stat;
pub mod tree;


#[cfg(test)]
mod fs_test;
