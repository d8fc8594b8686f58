//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use exporter_lib::Diagnostic;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of rows
pub fn print_table<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Render diagnostics, decode failures as warnings and skips as info
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        if diagnostic.is_decode_failure() {
            print_warning(&diagnostic.to_string());
        } else {
            print_info(&diagnostic.to_string());
        }
    }
}

/// Format a target percentage; 0 means not configured
pub fn format_percentage(percentage: i32) -> String {
    if percentage > 0 {
        format!("{}%", percentage)
    } else {
        "-".dimmed().to_string()
    }
}

/// Color a target percentage by how aggressive it is
pub fn color_percentage(percentage: i32) -> String {
    let formatted = format_percentage(percentage);
    match percentage {
        p if p <= 0 => formatted,
        p if p >= 90 => formatted.red().to_string(),
        p if p >= 75 => formatted.yellow().to_string(),
        _ => formatted.green().to_string(),
    }
}
