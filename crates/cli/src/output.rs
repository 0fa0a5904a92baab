//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled + Serialize>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("{}", "No items found".yellow());
                return;
            }
            let table = Table::new(items).with(Style::rounded()).to_string();
            println!("{}", table);
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(&items) {
                println!("{}", json);
            }
        }
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
#[allow(dead_code)]
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a day count
pub fn format_days(days: f64) -> String {
    format!("{:.1}d", days)
}

/// Format a USD amount
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Format a [0, 1] value to three decimals
pub fn format_feature(value: f64) -> String {
    format!("{:.3}", value)
}

/// Color a confidence percentage by band
pub fn color_confidence(confidence_pct: f64) -> String {
    let text = format!("{:.1}%", confidence_pct);
    if confidence_pct >= 85.0 {
        text.green().to_string()
    } else if confidence_pct >= 70.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Color a health status string
pub fn color_status(status: &str) -> String {
    match status {
        "healthy" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" => status.red().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(12.34), "12.3d");
        assert_eq!(format_days(0.0), "0.0d");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(80000.5), "$80000.50");
    }

    #[test]
    fn test_format_feature() {
        assert_eq!(format_feature(0.75), "0.750");
    }
}
