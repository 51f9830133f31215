//! Zone files: reading, whitespace preparation and the record model

pub mod reader;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub use reader::ZoneReader;

/// One resource record as written in a zone file.
///
/// `rdata` holds the record data by lower-case field name (`address`,
/// `cname`, `preference`, `exchange`, `nsdname`, `txtdata`, ...). Types
/// without a known layout keep their data under `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    pub name: String,
    pub record_type: String,
    pub ttl: Option<u32>,
    pub rdata: BTreeMap<String, String>,
}

impl ZoneRecord {
    pub fn new(name: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            ttl: None,
            rdata: BTreeMap::new(),
        }
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.rdata.insert(field.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.rdata.get(name).map(String::as_str)
    }
}

/// Turns zone-file text into records, in file order
pub trait ZoneParser {
    fn parse(&self, fqdn: &str, text: &str) -> Result<Vec<ZoneRecord>>;
}

/// Collapse every run of spaces and tabs to exactly two spaces
pub fn prepare_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;

    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push_str("  ");
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}

/// Read a zone file, failing with `UnreadableInput` when it cannot be read
pub fn read_zone_file(path: &str) -> Result<String> {
    if path.trim().is_empty() {
        return Err(Error::UnreadableInput {
            path: path.to_string(),
            reason: "no file given".to_string(),
        });
    }

    fs::read_to_string(Path::new(path)).map_err(|e| Error::UnreadableInput {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

/// Prepare and parse zone text with the given parser
pub fn parse_zone<P: ZoneParser>(parser: &P, fqdn: &str, text: &str) -> Result<Vec<ZoneRecord>> {
    parser.parse(fqdn, &prepare_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn runs_of_blanks_become_two_spaces() {
        assert_eq!(prepare_text("www\tIN \t A    1.2.3.4"), "www  IN  A  1.2.3.4");
        assert_eq!(prepare_text("a b\n\tc"), "a  b\n  c");
    }

    #[test]
    fn preparation_is_stable() {
        let once = prepare_text("@ \t\t MX 10  mail");
        assert_eq!(prepare_text(&once), once);
    }

    #[test]
    fn reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "@ A 1.2.3.4").unwrap();

        let text = read_zone_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(text, "@ A 1.2.3.4\n");
    }

    #[test]
    fn missing_or_empty_path_is_unreadable() {
        assert!(matches!(
            read_zone_file(""),
            Err(Error::UnreadableInput { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("zone.conf");
        assert!(matches!(
            read_zone_file(missing.to_str().unwrap()),
            Err(Error::UnreadableInput { .. })
        ));
    }
}
