//! DNS record payloads sent to the API

pub mod mapper;

use serde::{Deserialize, Serialize};

pub use mapper::{map_record, Mapped};

/// Record types the API accepts when creating a record by hand
pub const RECORD_TYPES: [&str; 8] = ["A", "AAAA", "MX", "CNAME", "TXT", "NS", "SRV", "CAA"];

/// TTL values the API accepts, in seconds
pub const TTLS: [u32; 9] = [300, 600, 900, 1800, 3600, 7200, 18000, 43200, 86400];

pub const DEFAULT_TTL: u32 = 300;
pub const DEFAULT_PRIORITY: i64 = 10;

/// The flat record shape the `dnsRecords` endpoint expects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordPayload {
    pub fqdn: String,
    pub name: String,
    pub value: String,
    pub record_type: String,
    pub ttl: u32,
    pub priority: i64,
    pub active: bool,
}

/// Values applied to every record that does not carry its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDefaults {
    pub active: bool,
    pub priority: i64,
    pub ttl: u32,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            active: false,
            priority: DEFAULT_PRIORITY,
            ttl: DEFAULT_TTL,
        }
    }
}
