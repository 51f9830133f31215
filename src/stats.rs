//! Statistic queries and their summary

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sources queried for the domain summary
pub const DATA_SOURCES: [&str; 7] = [
    "requests",
    "requests_cached",
    "requests_uncached",
    "bytes",
    "requests_blocked",
    "upstream_performance",
    "response_codes",
];

/// Response codes shown in the summary, `Other` collects the rest
pub const RESPONSE_CODES: [&str; 8] = ["200", "301", "302", "304", "403", "404", "500", "Other"];

const QUERY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticRequest {
    pub query: StatisticQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticQuery {
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "type")]
    pub query_type: String,
    pub fqdn: Vec<String>,
    pub aggregation_interval: String,
    pub data_sources: BTreeMap<String, DataSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub source: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Build the hourly statistic query for a domain and its subdomains.
///
/// Dates are taken as UTC.
pub fn build_query(fqdn: &str, start: NaiveDateTime, end: NaiveDateTime) -> StatisticRequest {
    let data_sources = DATA_SOURCES
        .iter()
        .map(|source| {
            (
                format!("{}_stats", source),
                DataSource {
                    source: source.to_string(),
                    kind: "stats".to_string(),
                },
            )
        })
        .collect();

    StatisticRequest {
        query: StatisticQuery {
            start_date: start.and_utc().format(QUERY_DATE_FORMAT).to_string(),
            end_date: end.and_utc().format(QUERY_DATE_FORMAT).to_string(),
            query_type: "fqdn".to_string(),
            fqdn: vec![format!("ALL:{}", fqdn)],
            aggregation_interval: "hour".to_string(),
            data_sources,
        },
    }
}

/// Totals extracted from a statistic response
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatisticSummary {
    pub requests: f64,
    pub requests_cached: f64,
    pub requests_uncached: f64,
    pub bytes: f64,
    pub requests_blocked: f64,
    /// Average upstream response time in seconds
    pub upstream_avg: f64,
    pub response_codes: Vec<(&'static str, f64)>,
}

impl StatisticSummary {
    /// Read `result.<source>_stats.sum|avg`; missing metrics count as zero
    pub fn from_response(response: &Value) -> Self {
        let result = response.get("result").unwrap_or(&Value::Null);
        let metric = |source: &str, field: &str| {
            result
                .get(format!("{}_stats", source))
                .and_then(|s| s.get(field))
                .and_then(Value::as_f64)
                .unwrap_or(0.0)
        };

        let codes = result.get("response_codes_stats");
        let response_codes = RESPONSE_CODES
            .iter()
            .map(|code| {
                let sum = codes
                    .and_then(|c| c.get(*code))
                    .and_then(|c| c.get("sum"))
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                (*code, sum)
            })
            .collect();

        Self {
            requests: metric("requests", "sum"),
            requests_cached: metric("requests_cached", "sum"),
            requests_uncached: metric("requests_uncached", "sum"),
            bytes: metric("bytes", "sum"),
            requests_blocked: metric("requests_blocked", "sum"),
            upstream_avg: metric("upstream_performance", "avg"),
            response_codes,
        }
    }
}
