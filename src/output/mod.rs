use crate::core::types::OutputFormat;
use crate::error::Result;
use crate::utils::print_colored_json;
use colored::*;
use comfy_table::{presets, Table};
use serde::Serialize;

pub mod device;
pub mod file;

pub use file::{format_size, render_tree, SizeInfo, TransferRecord};

/// Rows of a borderless table
pub trait TableFormat {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

/// One line per item, for scripts
pub trait PlainFormat {
    fn plain(&self) -> String;
}

/// Build the table printed for `items`
pub fn table_of<T: TableFormat>(items: &[T]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(T::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

/// Prints command results. Everything except errors is dropped in quiet mode.
pub struct OutputFormatter {
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print `items` in the requested format
    pub fn render<T>(&self, format: OutputFormat, items: &[T]) -> Result<()>
    where
        T: TableFormat + PlainFormat + Serialize,
    {
        if self.quiet {
            return Ok(());
        }
        match format {
            OutputFormat::Json => print_colored_json(items)?,
            OutputFormat::Table => println!("{}", table_of(items)),
            OutputFormat::Plain => items.iter().for_each(|item| println!("{}", item.plain())),
        }
        Ok(())
    }

    /// Print any serializable value as JSON
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        if self.quiet {
            return Ok(());
        }
        print_colored_json(value)
    }

    pub fn message(&self, msg: &str) -> Result<()> {
        if !self.quiet {
            println!("{}", msg);
        }
        Ok(())
    }

    pub fn info(&self, msg: &str) -> Result<()> {
        self.message(&msg.bright_blue().to_string())
    }

    pub fn success(&self, msg: &str) -> Result<()> {
        self.message(&msg.bright_green().to_string())
    }

    /// Errors go to stderr, even in quiet mode
    pub fn error(&self, msg: &str) -> Result<()> {
        eprintln!("{}", msg.bright_red());
        Ok(())
    }
}
