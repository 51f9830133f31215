//! DNS record command

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::api::{ApiClient, ApiMethod, ApiResponse, MyraClient};
use crate::cli::{GlobalArgs, RawBuilder, Target};
use crate::config::Config;
use crate::error::Error;
use crate::options::{
    common_schema, resolve, Normalizer, OptionSchema, OptionSpec, RawOptions, ResolvedOptions,
};
use crate::output;
use crate::records::{DnsRecordPayload, DEFAULT_PRIORITY, DEFAULT_TTL, RECORD_TYPES, TTLS};

#[derive(Args, Debug)]
#[command(after_help = "Example:\n  myra dns-record -r www -i 192.0.2.10 -t A <API_KEY> <SECRET> <FQDN>")]
pub struct DnsRecordArgs {
    #[command(flatten)]
    pub target: Target,

    /// Record name: a subdomain, a wildcard or empty for the domain itself
    #[arg(short = 'r', long, alias = "recordName")]
    pub record_name: Option<String>,

    /// Record value: IPv4 for A, IPv6 for AAAA, a domain name for CNAME, MX and NS, free text for TXT
    #[arg(short = 'i', long, alias = "recordValue")]
    pub record_value: Option<String>,

    /// Record type: A, AAAA, MX, CNAME, TXT, NS, SRV or CAA
    #[arg(short = 't', long, alias = "recordType")]
    pub record_type: Option<String>,

    /// Time to live in seconds (300, 600, 900, 1800, 3600, 7200, 18000, 43200, 86400)
    #[arg(long)]
    pub ttl: Option<String>,

    /// Protect this subdomain through Myracloud
    #[arg(long)]
    pub active: bool,

    /// Priority for MX and SRV records
    #[arg(long)]
    pub priority: Option<String>,
}

impl DnsRecordArgs {
    fn raw_options(&self, global: &GlobalArgs) -> RawOptions {
        let mut raw = RawBuilder::new(global, &self.target);
        raw.set("recordName", self.record_name.as_ref())
            .set("recordValue", self.record_value.as_ref())
            .set("recordType", self.record_type.as_ref())
            .set("ttl", self.ttl.as_ref())
            .set("priority", self.priority.as_ref());
        if self.active {
            raw.set("active", Some(true));
        }
        raw.build()
    }
}

/// Options of the dns-record command
pub fn schema() -> OptionSchema {
    common_schema()
        .option(OptionSpec::new("recordName").required())
        .option(OptionSpec::new("recordValue").required())
        .option(
            OptionSpec::new("recordType")
                .required()
                .allowed(RECORD_TYPES),
        )
        .option(
            OptionSpec::new("ttl")
                .default_value(DEFAULT_TTL.to_string())
                .allowed(TTLS)
                .normalize(Normalizer::Integer),
        )
        .option(
            OptionSpec::new("priority")
                .default_value(DEFAULT_PRIORITY.to_string())
                .normalize(Normalizer::Integer),
        )
        .option(
            OptionSpec::new("active")
                .default_value("false")
                .normalize(Normalizer::Flag),
        )
}

/// Build the record payload from resolved options
pub fn payload(options: &ResolvedOptions) -> Result<DnsRecordPayload, Error> {
    let ttl = options
        .int("ttl")
        .and_then(|ttl| u32::try_from(ttl).ok())
        .ok_or_else(|| Error::invalid("ttl", "must be a positive number of seconds"))?;

    Ok(DnsRecordPayload {
        fqdn: options.require_str("fqdn")?.to_string(),
        name: options.require_str("recordName")?.to_string(),
        value: options.require_str("recordValue")?.to_string(),
        record_type: options.require_str("recordType")?.to_string(),
        ttl,
        priority: options.int("priority").unwrap_or(DEFAULT_PRIORITY),
        active: options.flag("active"),
    })
}

/// Create one record; a failed call fails the command
pub async fn create<C: ApiClient + ?Sized>(
    client: &C,
    payload: &DnsRecordPayload,
) -> Result<ApiResponse, Error> {
    debug!("Creating record: {:?}", payload);
    let response = client
        .dns_record(ApiMethod::Create, &payload.fqdn, payload)
        .await?;
    Ok(response)
}

pub async fn execute(global: &GlobalArgs, args: DnsRecordArgs) -> Result<()> {
    let options = resolve(&schema(), &args.raw_options(global))?;
    let config = Config::from_options(&options)?;
    let payload = payload(&options)?;

    let client = MyraClient::new(&config)?;
    let response = create(&client, &payload).await?;

    if global.verbose() {
        output::print_output(&response, &config.output_format)?;
    }

    output::success(&format!(
        "Created {} record",
        output::record_label(&payload.record_type, &payload.name)
    ));
    output::table_header(&["TYPE", "NAME", "VALUE", "ACTIVE", "TTL", "PRIORITY"]);
    output::print_dns_record(&payload);

    Ok(())
}
