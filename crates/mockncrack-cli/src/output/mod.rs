//! Terminal output for operator commands
//!
//! Rows render either as a rounded table or as pretty JSON; status lines go
//! to stdout (green) or stderr (yellow).

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::{Rotate, Style};
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Render a list of rows
pub fn render_rows<T>(rows: &[T], format: OutputFormat) -> anyhow::Result<String>
where
    T: Serialize + Tabled,
{
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
        OutputFormat::Table if rows.is_empty() => "(none)".to_string(),
        OutputFormat::Table => Table::new(rows).with(Style::rounded()).to_string(),
    })
}

/// Render one record; tables are turned into a field/value listing
pub fn render_record<T>(record: &T, format: OutputFormat) -> anyhow::Result<String>
where
    T: Serialize + Tabled,
{
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(record)?,
        OutputFormat::Table => Table::new([record])
            .with(Rotate::Left)
            .with(Style::rounded())
            .to_string(),
    })
}

pub fn print_rows<T>(rows: &[T], format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    println!("{}", render_rows(rows, format)?);
    Ok(())
}

pub fn print_record<T>(record: &T, format: OutputFormat) -> anyhow::Result<()>
where
    T: Serialize + Tabled,
{
    println!("{}", render_record(record, format)?);
    Ok(())
}

/// Completion message, silenced by `--quiet`
pub fn done(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message.green());
    }
}

pub fn warn(message: &str) {
    eprintln!("{}", message.yellow());
}
