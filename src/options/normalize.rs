//! Normalizers turning raw option strings into typed values
//!
//! Every function here is pure: the same input always yields the same value or
//! the same failure message. The resolver attaches the option name to failures.

use chrono::NaiveDateTime;

use super::OptionValue;

/// Date format accepted on the command line
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Normalize a domain name: trim, lower-case, strip scheme, path, port and
/// trailing dot, then validate the hostname grammar.
pub fn normalize_fqdn(raw: &str) -> Result<String, String> {
    let mut host = raw.trim().to_lowercase();

    if let Some(idx) = host.find("://") {
        host.drain(..idx + 3);
    }
    if let Some(idx) = host.find('/') {
        host.truncate(idx);
    }
    if let Some(idx) = host.rfind(':') {
        let port = &host[idx + 1..];
        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("'{}' has an invalid port", raw.trim()));
        }
        host.truncate(idx);
    }
    if host.ends_with('.') {
        host.pop();
    }

    validate_hostname(&host)?;
    Ok(host)
}

fn validate_hostname(host: &str) -> Result<(), String> {
    if host.is_empty() {
        return Err("hostname is empty".to_string());
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "hostname is longer than {} characters",
            MAX_HOSTNAME_LEN
        ));
    }

    for label in host.split('.') {
        if label.is_empty() {
            return Err(format!("'{}' contains an empty label", host));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(format!(
                "label '{}' is longer than {} characters",
                label, MAX_LABEL_LEN
            ));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(format!("label '{}' contains invalid characters", label));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!(
                "label '{}' must not start or end with a hyphen",
                label
            ));
        }
    }

    Ok(())
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// Absent or blank input is `Null` unless `required` is set.
pub fn normalize_date(raw: Option<&str>, required: bool) -> Result<OptionValue, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None if required => Err("a date is required (format: YYYY-MM-DD HH:MM:SS)".to_string()),
        None => Ok(OptionValue::Null),
        Some(s) => NaiveDateTime::parse_from_str(s, DATE_FORMAT)
            .map(OptionValue::Date)
            .map_err(|_| format!("'{}' does not match format YYYY-MM-DD HH:MM:SS", s)),
    }
}

/// Parse a decimal integer
pub fn normalize_integer(raw: &str) -> Result<i64, String> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("'{}' is not an integer", raw))
}

/// Parse a boolean flag
pub fn normalize_flag(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(format!("'{}' is not a boolean", other)),
    }
}
