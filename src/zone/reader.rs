//! Master-file reader
//!
//! Understands comments, `$ORIGIN` and `$TTL`, parenthesised multi-line
//! records, quoted strings, blank-owner inheritance and optional TTL and class
//! columns. Owner names come out relative to the zone apex, with `@` for the apex.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::zone::{ZoneParser, ZoneRecord};

const CLASSES: [&str; 4] = ["IN", "CH", "HS", "CS"];

/// Reads zone-file text into records
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneReader;

impl ZoneParser for ZoneReader {
    fn parse(&self, fqdn: &str, text: &str) -> Result<Vec<ZoneRecord>> {
        let apex = absolute(fqdn);
        let mut origin = apex.clone();
        let mut default_ttl = None;
        let mut last_owner: Option<String> = None;
        let mut records = Vec::new();

        for line in logical_lines(text)? {
            let number = line.number;
            let err = |reason: String| Error::Zone {
                line: number,
                reason,
            };

            let mut rest = line.tokens.as_slice();

            if let Some(directive) = rest[0].strip_prefix('$') {
                let arg = rest
                    .get(1)
                    .ok_or_else(|| err(format!("${} needs an argument", directive)))?;
                match directive.to_uppercase().as_str() {
                    "ORIGIN" => origin = qualify(arg, &origin),
                    "TTL" => default_ttl = Some(parse_ttl(arg).map_err(err)?),
                    other => return Err(err(format!("unsupported directive ${}", other))),
                }
                continue;
            }

            let owner = if line.inherits_owner {
                last_owner
                    .clone()
                    .ok_or_else(|| err("record has no owner name".to_string()))?
            } else {
                let owner = owner_name(&rest[0], &origin, &apex);
                rest = &rest[1..];
                owner
            };
            last_owner = Some(owner.clone());

            let mut ttl = None;
            while let Some(token) = rest.first() {
                if CLASSES.contains(&token.to_uppercase().as_str()) {
                    rest = &rest[1..];
                } else if ttl.is_none() && token.starts_with(|c: char| c.is_ascii_digit()) {
                    ttl = Some(parse_ttl(token).map_err(err)?);
                    rest = &rest[1..];
                } else {
                    break;
                }
            }

            let (record_type, data) = rest
                .split_first()
                .ok_or_else(|| err("missing record type".to_string()))?;
            let record_type = record_type.to_uppercase();
            if !record_type.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(err(format!("invalid record type '{}'", record_type)));
            }

            let rdata = rdata_fields(&record_type, data).map_err(err)?;

            records.push(ZoneRecord {
                name: owner,
                record_type,
                ttl: ttl.or(default_ttl),
                rdata,
            });
        }

        Ok(records)
    }
}

struct LogicalLine {
    number: usize,
    inherits_owner: bool,
    tokens: Vec<String>,
}

/// Split text into logical lines, joining parenthesised continuations
fn logical_lines(text: &str) -> Result<Vec<LogicalLine>> {
    let mut lines = Vec::new();
    let mut current: Option<LogicalLine> = None;
    let mut depth: i64 = 0;

    for (idx, raw) in text.lines().enumerate() {
        let number = idx + 1;
        let (tokens, delta) = tokenize(raw).map_err(|reason| Error::Zone {
            line: number,
            reason,
        })?;

        if depth > 0 {
            if let Some(line) = current.as_mut() {
                line.tokens.extend(tokens);
            }
        } else {
            current = Some(LogicalLine {
                number,
                inherits_owner: raw.starts_with([' ', '\t']),
                tokens,
            });
        }

        depth += delta;
        if depth < 0 {
            return Err(Error::Zone {
                line: number,
                reason: "unbalanced ')'".to_string(),
            });
        }

        if depth == 0 {
            if let Some(line) = current.take() {
                if !line.tokens.is_empty() {
                    lines.push(line);
                }
            }
        }
    }

    if let Some(line) = current {
        return Err(Error::Zone {
            line: line.number,
            reason: "unclosed '('".to_string(),
        });
    }

    Ok(lines)
}

/// Tokens of one physical line and its change in parenthesis depth
fn tokenize(line: &str) -> Result<(Vec<String>, i64), String> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut delta = 0;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            ';' => break,
            '"' => {
                flush(&mut token, &mut tokens);
                let mut quoted = String::new();
                let mut closed = false;
                while let Some(q) = chars.next() {
                    match q {
                        '\\' => quoted.extend(chars.next()),
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => quoted.push(q),
                    }
                }
                if !closed {
                    return Err("unterminated quoted string".to_string());
                }
                tokens.push(quoted);
            }
            '(' => {
                flush(&mut token, &mut tokens);
                delta += 1;
            }
            ')' => {
                flush(&mut token, &mut tokens);
                delta -= 1;
            }
            c if c.is_whitespace() => flush(&mut token, &mut tokens),
            c => token.push(c),
        }
    }
    flush(&mut token, &mut tokens);

    Ok((tokens, delta))
}

fn flush(token: &mut String, tokens: &mut Vec<String>) {
    if !token.is_empty() {
        tokens.push(std::mem::take(token));
    }
}

fn absolute(name: &str) -> String {
    let name = name.to_lowercase();
    if name.ends_with('.') {
        name
    } else {
        format!("{}.", name)
    }
}

/// Absolute form of `name` under `origin`
fn qualify(name: &str, origin: &str) -> String {
    if name == "@" {
        origin.to_string()
    } else if name.ends_with('.') {
        name.to_lowercase()
    } else {
        format!("{}.{}", name.to_lowercase(), origin)
    }
}

/// Owner name relative to the apex, `@` for the apex itself.
///
/// Relative names under the apex origin are kept as written; names outside
/// the zone stay absolute.
fn owner_name(name: &str, origin: &str, apex: &str) -> String {
    if origin == apex && !name.ends_with('.') {
        return name.to_string();
    }

    let name = qualify(name, origin);
    if name == apex {
        return "@".to_string();
    }
    match name.strip_suffix(&format!(".{}", apex)) {
        Some(relative) => relative.to_string(),
        None => name,
    }
}

/// Parse a TTL such as `3600`, `1h` or `1h30m`
fn parse_ttl(raw: &str) -> Result<u32, String> {
    let invalid = || format!("invalid TTL '{}'", raw);
    if raw.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    let mut number: Option<u64> = None;

    for c in raw.chars() {
        if let Some(digit) = c.to_digit(10) {
            number = Some(number.unwrap_or(0) * 10 + u64::from(digit));
            if number > Some(u64::from(u32::MAX)) {
                return Err(invalid());
            }
            continue;
        }

        let unit = match c.to_ascii_lowercase() {
            's' => 1,
            'm' => 60,
            'h' => 3_600,
            'd' => 86_400,
            'w' => 604_800,
            _ => return Err(invalid()),
        };
        total += number.take().ok_or_else(invalid)? * unit;
    }
    total += number.unwrap_or(0);

    u32::try_from(total).map_err(|_| invalid())
}

fn field_names(record_type: &str) -> Option<&'static [&'static str]> {
    let names: &'static [&'static str] = match record_type {
        "A" | "AAAA" => &["address"],
        "CNAME" => &["cname"],
        "NS" => &["nsdname"],
        "PTR" => &["ptrdname"],
        "MX" => &["preference", "exchange"],
        "SRV" => &["priority", "weight", "port", "target"],
        "CAA" => &["flags", "tag", "value"],
        "SOA" => &[
            "mname", "rname", "serial", "refresh", "retry", "expire", "minimum",
        ],
        _ => return None,
    };
    Some(names)
}

fn rdata_fields(record_type: &str, data: &[String]) -> Result<BTreeMap<String, String>, String> {
    let mut rdata = BTreeMap::new();

    if matches!(record_type, "TXT" | "SPF") {
        if data.is_empty() {
            return Err(format!("{} record has no text", record_type));
        }
        rdata.insert("txtdata".to_string(), data.concat());
        return Ok(rdata);
    }

    let Some(names) = field_names(record_type) else {
        rdata.insert("data".to_string(), data.join(" "));
        return Ok(rdata);
    };

    if data.len() < names.len() {
        return Err(format!(
            "{} record needs {} fields, found {}",
            record_type,
            names.len(),
            data.len()
        ));
    }

    // surplus tokens belong to the last field
    for (idx, name) in names.iter().enumerate() {
        let value = if idx + 1 == names.len() {
            data[idx..].join(" ")
        } else {
            data[idx].clone()
        };
        rdata.insert(name.to_string(), value);
    }

    Ok(rdata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::prepare_text;

    fn parse(text: &str) -> Result<Vec<ZoneRecord>> {
        ZoneReader.parse("example.com", &prepare_text(text))
    }

    #[test]
    fn reads_records_in_file_order() {
        let records = parse(
            "$TTL 3600\n\
             @ IN A 1.2.3.4\n\
             www IN CNAME @\n\
             @ IN MX 20 mail.example.com.\n",
        )
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "@");
        assert_eq!(records[0].field("address"), Some("1.2.3.4"));
        assert_eq!(records[0].ttl, Some(3600));
        assert_eq!(records[1].record_type, "CNAME");
        assert_eq!(records[1].field("cname"), Some("@"));
        assert_eq!(records[2].field("preference"), Some("20"));
        assert_eq!(records[2].field("exchange"), Some("mail.example.com."));
    }

    #[test]
    fn ttl_and_class_are_optional_and_unordered() {
        let records = parse("a 300 IN A 1.1.1.1\nb IN 1h A 2.2.2.2\nc A 3.3.3.3\n").unwrap();

        assert_eq!(records[0].ttl, Some(300));
        assert_eq!(records[1].ttl, Some(3600));
        assert_eq!(records[2].ttl, None);
        assert!(records.iter().all(|r| r.record_type == "A"));
    }

    #[test]
    fn blank_owner_inherits_previous_name() {
        let records = parse("mail IN A 1.2.3.4\n\tIN AAAA 2001:db8::1\n").unwrap();
        assert_eq!(records[1].name, "mail");
        assert_eq!(records[1].field("address"), Some("2001:db8::1"));
    }

    #[test]
    fn comments_and_parentheses() {
        let records = parse(
            "; zone for example.com\n\
             @ IN SOA ns1.example.com. hostmaster.example.com. (\n\
             \t2024010101 ; serial\n\
             \t3600 900 604800 300 )\n\
             @ IN NS ns1.example.com. ; primary\n",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record_type, "SOA");
        assert_eq!(records[0].field("serial"), Some("2024010101"));
        assert_eq!(records[0].field("minimum"), Some("300"));
        assert_eq!(records[1].field("nsdname"), Some("ns1.example.com."));
    }

    #[test]
    fn quoted_text_keeps_semicolons() {
        let records = parse("@ IN TXT \"v=spf1 mx; -all\"\n").unwrap();
        assert_eq!(records[0].field("txtdata"), Some("v=spf1  mx;  -all"));
    }

    #[test]
    fn origin_qualifies_relative_names() {
        let records = parse(
            "$ORIGIN sub.example.com.\n\
             www A 1.2.3.4\n\
             @ A 1.2.3.5\n\
             $ORIGIN example.com.\n\
             api A 1.2.3.6\n",
        )
        .unwrap();

        assert_eq!(records[0].name, "www.sub");
        assert_eq!(records[1].name, "sub");
        assert_eq!(records[2].name, "api");
    }

    #[test]
    fn relative_origin_extends_current_origin() {
        let records = parse(
            "$ORIGIN sub\n\
             www A 1.2.3.4\n\
             @ A 1.2.3.5\n\
             $ORIGIN deeper\n\
             api A 1.2.3.6\n",
        )
        .unwrap();

        assert_eq!(records[0].name, "www.sub");
        assert_eq!(records[1].name, "sub");
        assert_eq!(records[2].name, "api.deeper.sub");
    }

    #[test]
    fn absolute_owners_become_relative_to_apex() {
        let records = parse(
            "Example.com. A 5.6.7.8\n\
             www.example.com. A 9.9.9.9\n\
             mail.other.org. A 1.1.1.1\n",
        )
        .unwrap();

        assert_eq!(records[0].name, "@");
        assert_eq!(records[1].name, "www");
        assert_eq!(records[2].name, "mail.other.org.");
    }

    #[test]
    fn unknown_types_keep_raw_data() {
        let records = parse("@ IN HINFO \"PC\" \"Linux\"\n").unwrap();
        assert_eq!(records[0].field("data"), Some("PC Linux"));
    }

    #[test]
    fn malformed_input_reports_line() {
        match parse("@ A 1.2.3.4\nwww MX 10\n") {
            Err(Error::Zone { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected zone error, got {other:?}"),
        }

        assert!(matches!(parse("@ TXT \"open\n"), Err(Error::Zone { line: 1, .. })));
        assert!(matches!(parse("@ SOA a b (\n1 2\n"), Err(Error::Zone { line: 1, .. })));
        assert!(matches!(parse("  A 1.2.3.4\n"), Err(Error::Zone { .. })));
        assert!(matches!(parse("$INCLUDE other.zone\n"), Err(Error::Zone { .. })));
    }

    #[test]
    fn ttl_units() {
        assert_eq!(parse_ttl("300"), Ok(300));
        assert_eq!(parse_ttl("1h30m"), Ok(5400));
        assert_eq!(parse_ttl("1w"), Ok(604_800));
        assert!(parse_ttl("h").is_err());
        assert!(parse_ttl("10x").is_err());
        assert!(parse_ttl("99999999999").is_err());
    }
}
