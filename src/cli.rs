use crate::commands::{
    browse::BrowseArgs, cp::CpArgs, devices::DevicesArgs, ls::LsArgs, mkdir::MkdirArgs,
    mv::MvArgs, pull::PullArgs, push::PushArgs, rm::RmArgs, stat::StatArgs, tree::TreeArgs,
};
use crate::config::Overrides;
use crate::core::types::OutputFormat;
use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum OutputType {
    Table,
    Json,
    Plain,
}

impl From<OutputType> for OutputFormat {
    fn from(value: OutputType) -> Self {
        match value {
            OutputType::Table => OutputFormat::Table,
            OutputType::Json => OutputFormat::Json,
            OutputType::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Commands>,

    /// Device ID (can be partial; required if multiple devices are connected)
    #[arg(long, short = 'd', global = true)]
    pub device: Option<String>,

    /// Path to the adb executable
    #[arg(long, global = true)]
    pub adb: Option<String>,

    /// Remote browsing root
    #[arg(long, global = true)]
    pub root: Option<String>,

    /// Timeout in seconds for each adb command
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "table")]
    pub output: OutputType,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Lists connected devices
    Devices(DevicesArgs),

    /// Lists a remote directory
    Ls(LsArgs),

    /// Shows the remote directory tree
    Tree(TreeArgs),

    /// Creates a remote directory (and its parents)
    Mkdir(MkdirArgs),

    /// Removes remote files or directories recursively
    Rm(RmArgs),

    /// Copies a remote file or directory
    Cp(CpArgs),

    /// Moves or renames a remote file or directory
    Mv(MvArgs),

    /// Shows the size of a remote file
    Stat(StatArgs),

    /// Copies local files to the device
    Push(PushArgs),

    /// Copies files from the device
    Pull(PullArgs),

    /// Interactive file browser
    Browse(BrowseArgs),
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Devices(DevicesArgs::default()))
    }

    /// `-q` silences logging; progress bars and status messages go with it
    pub fn quiet(&self) -> bool {
        self.verbose.is_silent()
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            adb_path: self.adb.clone(),
            root: self.root.clone(),
            device: self.device.clone(),
            timeout_secs: self.timeout,
        }
    }
}
