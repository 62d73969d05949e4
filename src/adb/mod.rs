pub mod bridge;
pub mod parse;
pub mod runner;
pub mod shell;

pub use bridge::Bridge;
pub use runner::{ProcessRunner, ToolOutput, ToolRunner};
pub use shell::{shell_quote, ShellCommand};
