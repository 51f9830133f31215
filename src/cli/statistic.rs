//! Statistic command

use anyhow::Result;
use chrono::{Days, NaiveDateTime, NaiveTime, Utc};
use clap::Args;
use serde_json::Value;

use crate::api::{ApiClient, ApiMethod, MyraClient};
use crate::cli::{GlobalArgs, RawBuilder, Target};
use crate::config::{Config, OutputFormat};
use crate::error::Error;
use crate::options::normalize::DATE_FORMAT;
use crate::options::{common_schema, resolve, Normalizer, OptionSchema, OptionSpec, RawOptions};
use crate::output;
use crate::stats::{build_query, StatisticSummary, RESPONSE_CODES};

#[derive(Args, Debug)]
#[command(
    after_help = "Example:\n  myra statistic -s '2017-12-13 00:00:00' -e '2017-12-13 12:00:59' <API_KEY> <SECRET> <FQDN>"
)]
pub struct StatisticArgs {
    #[command(flatten)]
    pub target: Target,

    /// Start of the period, YYYY-MM-DD HH:MM:SS or yesterday/today/now [default: yesterday]
    #[arg(short = 's', long, alias = "startDate")]
    pub start_date: Option<String>,

    /// End of the period, YYYY-MM-DD HH:MM:SS or yesterday/today/now [default: now]
    #[arg(short = 'e', long, alias = "endDate")]
    pub end_date: Option<String>,
}

impl StatisticArgs {
    fn raw_options(&self, global: &GlobalArgs, now: NaiveDateTime) -> RawOptions {
        let mut raw = RawBuilder::new(global, &self.target);
        raw.set(
            "startDate",
            self.start_date.as_deref().map(|d| absolute_date(d, now)),
        )
        .set(
            "endDate",
            self.end_date.as_deref().map(|d| absolute_date(d, now)),
        );
        raw.build()
    }
}

/// Replace the keywords `now`, `today` and `yesterday` by a timestamp
fn absolute_date(raw: &str, now: NaiveDateTime) -> String {
    let midnight = now.date().and_time(NaiveTime::MIN);
    let resolved = match raw.trim().to_lowercase().as_str() {
        "now" => now,
        "today" => midnight,
        "yesterday" => midnight - Days::new(1),
        _ => return raw.to_string(),
    };
    resolved.format(DATE_FORMAT).to_string()
}

/// Options of the statistic command; dates default to yesterday and now
pub fn schema(now: NaiveDateTime) -> OptionSchema {
    common_schema()
        .option(
            OptionSpec::new("startDate")
                .default_value(absolute_date("yesterday", now))
                .normalize(Normalizer::Date { required: true }),
        )
        .option(
            OptionSpec::new("endDate")
                .default_value(absolute_date("now", now))
                .normalize(Normalizer::Date { required: true }),
        )
}

/// Query the statistics of a domain
pub async fn query<C: ApiClient + ?Sized>(
    client: &C,
    fqdn: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Value, Error> {
    if end < start {
        return Err(Error::invalid("endDate", "must not be before startDate"));
    }

    let request = build_query(fqdn, start, end);
    let response = client.statistic(ApiMethod::Update, &request).await?;
    Ok(response)
}

pub async fn execute(global: &GlobalArgs, args: StatisticArgs) -> Result<()> {
    let now = Utc::now().naive_utc();
    let options = resolve(&schema(now), &args.raw_options(global, now))?;
    let config = Config::from_options(&options)?;
    let fqdn = options.require_str("fqdn")?;
    let start = options.require_date("startDate")?;
    let end = options.require_date("endDate")?;

    let client = MyraClient::new(&config)?;
    let response = query(&client, fqdn, start, end).await?;

    match config.output_format {
        OutputFormat::Json => output::print_json(&response)?,
        OutputFormat::Table => {
            if global.verbose() {
                output::print_json_pretty(&response)?;
            }
            let separator = if config.language == "de" { '.' } else { ',' };
            print_summary(fqdn, &StatisticSummary::from_response(&response), separator);
        }
    }

    Ok(())
}

fn print_summary(fqdn: &str, summary: &StatisticSummary, separator: char) {
    let mut header = vec![
        "DOMAIN",
        "REQUESTS (CACHED/UNCACHED)",
        "TRAFFIC",
        "BLOCKED",
        "Ø UPSTREAM",
    ];
    header.extend(RESPONSE_CODES);
    output::table_header(&header);
    output::table_row(&summary_row(fqdn, summary, separator));
}

fn summary_row(fqdn: &str, summary: &StatisticSummary, separator: char) -> Vec<String> {
    let mut row = vec![
        fqdn.to_string(),
        format!(
            "{} ({}/{})",
            output::format_thousands(summary.requests, separator),
            output::format_thousands(summary.requests_cached, separator),
            output::format_thousands(summary.requests_uncached, separator)
        ),
        output::format_gigabytes(summary.bytes),
        output::format_thousands(summary.requests_blocked, separator),
        output::format_millis(summary.upstream_avg),
    ];
    row.extend(
        summary
            .response_codes
            .iter()
            .map(|(_, sum)| output::format_thousands(*sum, separator)),
    );
    row
}
