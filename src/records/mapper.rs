//! Zone records to API payloads

use std::fmt;

use crate::records::{DnsRecordPayload, RecordDefaults};
use crate::zone::ZoneRecord;

/// Record types the zone import submits
pub const IMPORTED_TYPES: [&str; 5] = ["A", "AAAA", "CNAME", "MX", "NS"];

/// Result of mapping one zone record
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    Record(DnsRecordPayload),
    Skip {
        record_type: String,
        name: String,
        reason: SkipReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedType,
    MissingField(&'static str),
    InvalidPreference(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedType => write!(f, "record type is not imported"),
            Self::MissingField(field) => write!(f, "record has no {} field", field),
            Self::InvalidPreference(value) => write!(f, "MX preference '{}' is not a number", value),
        }
    }
}

/// Map a zone record onto the API payload, or skip it.
///
/// The apex name `@` becomes an empty name. MX records carry their preference
/// as priority; every other record uses the default priority.
pub fn map_record(record: &ZoneRecord, fqdn: &str, defaults: &RecordDefaults) -> Mapped {
    let record_type = record.record_type.to_uppercase();
    let name = if record.name == "@" {
        String::new()
    } else {
        record.name.clone()
    };

    let skip = |reason| Mapped::Skip {
        record_type: record_type.clone(),
        name: record.name.clone(),
        reason,
    };

    let field = match record_type.as_str() {
        "A" | "AAAA" => "address",
        "CNAME" => "cname",
        "MX" => "exchange",
        "NS" => "nsdname",
        _ => return skip(SkipReason::UnsupportedType),
    };

    let Some(value) = record.field(field) else {
        return skip(SkipReason::MissingField(field));
    };

    let priority = if record_type == "MX" {
        match record.field("preference").map(|p| p.parse::<i64>()) {
            Some(Ok(preference)) => preference,
            Some(Err(_)) => {
                let raw = record.field("preference").unwrap_or_default().to_string();
                return skip(SkipReason::InvalidPreference(raw));
            }
            None => return skip(SkipReason::MissingField("preference")),
        }
    } else {
        defaults.priority
    };

    Mapped::Record(DnsRecordPayload {
        fqdn: fqdn.to_string(),
        name,
        value: value.to_string(),
        record_type,
        ttl: defaults.ttl,
        priority,
        active: defaults.active,
    })
}
