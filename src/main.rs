use adbx::adb::{Bridge, ProcessRunner};
use adbx::cli::Cli;
use adbx::commands::runner::CommandRunner;
use adbx::config::{Config, Settings};
use adbx::core::context::CommandContextBuilder;
use adbx::error::Result;
use clap::Parser;
use colored::*;
use log::debug;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{}", format!("Error: {}", e).bright_red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load();
    let settings = Settings::resolve(&config, &cli.overrides())?;
    debug!("Using adb at {}", settings.adb_path.display());

    let runner = ProcessRunner::new(settings.adb_path.clone(), settings.command_timeout);
    let bridge = Bridge::new(Arc::new(runner));

    let ctx = CommandContextBuilder::new(bridge, settings)
        .output_format(cli.output.into())
        .quiet(cli.quiet())
        .build();

    CommandRunner::new(ctx).run(cli.command()).await
}
