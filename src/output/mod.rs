//! Output formatting module

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::records::DnsRecordPayload;

/// Print structured output in the configured format
pub fn print_output<T: Serialize>(data: &T, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Table => print_json_pretty(data),
    }
}

/// Print as formatted JSON
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string(data)?);
    Ok(())
}

/// Print as pretty JSON
pub fn print_json_pretty<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Print success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print warning message
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

/// Print a table header
pub fn table_header(columns: &[&str]) {
    let header: Vec<String> = columns
        .iter()
        .map(|c| c.bold().underline().to_string())
        .collect();
    println!("{}", header.join("\t"));
}

/// Print a table row
pub fn table_row(cells: &[String]) {
    println!("{}", cells.join("\t"));
}

/// Print DNS record payload in table format
pub fn print_dns_record(record: &DnsRecordPayload) {
    let name = if record.name.is_empty() {
        "@"
    } else {
        record.name.as_str()
    };

    let active = if record.active {
        "●".bright_yellow().to_string()
    } else {
        "○".dimmed().to_string()
    };

    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        record.record_type.cyan(),
        name.bold(),
        record.value,
        active,
        format!("{}s", record.ttl).dimmed(),
        record.priority.to_string().dimmed()
    );
}

/// Label for a record name, showing the apex as `@`
pub fn record_label(record_type: &str, name: &str) -> String {
    let name = if name.is_empty() { "@" } else { name };
    format!("{} {}", record_type, name)
}

/// Group an integer with a thousands separator: `1234567` -> `1.234.567`
pub fn format_thousands(value: f64, separator: char) -> String {
    let digits = (value.round() as i64).unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }

    if value.round() < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Whole gigabytes, rounded
pub fn format_gigabytes(bytes: f64) -> String {
    const GB: f64 = 1024.0 * 1024.0 * 1024.0;
    format!("{} GB", (bytes / GB).round())
}

/// Seconds as whole milliseconds, rounded down
pub fn format_millis(seconds: f64) -> String {
    format!("{} ms", (seconds * 1000.0).floor())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(format_thousands(0.0, '.'), "0");
        assert_eq!(format_thousands(999.0, '.'), "999");
        assert_eq!(format_thousands(1000.0, '.'), "1.000");
        assert_eq!(format_thousands(1_234_567.0, ','), "1,234,567");
        assert_eq!(format_thousands(-4321.0, '.'), "-4.321");
    }

    #[test]
    fn traffic_and_latency() {
        assert_eq!(format_gigabytes(3_221_225_472.0), "3 GB");
        assert_eq!(format_gigabytes(0.0), "0 GB");
        assert_eq!(format_millis(0.2345), "234 ms");
    }

    #[test]
    fn apex_label() {
        assert_eq!(record_label("A", ""), "A @");
        assert_eq!(record_label("CNAME", "www"), "CNAME www");
    }
}
