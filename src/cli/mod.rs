//! CLI commands module

pub mod dns_record;
pub mod statistic;
pub mod zone_import;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::options::RawOptions;

/// Myracloud CLI
#[derive(Parser, Debug)]
#[command(name = "myra")]
#[command(version)]
#[command(about = "Myracloud CLI - DNS records, zone import and statistics", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose output; repeat for more detail (-vv, -vvv)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbosity: u8,

    /// Output format: table, json
    #[arg(long, global = true, env = "MYRA_OUTPUT_FORMAT")]
    pub format: Option<String>,

    /// API language: en, de
    #[arg(long, global = true, env = "MYRA_LANGUAGE")]
    pub language: Option<String>,

    /// API host name
    #[arg(long, alias = "apiEndpoint", global = true, env = "MYRA_API_ENDPOINT")]
    pub api_endpoint: Option<String>,

    /// Do not verify the server certificate
    #[arg(long, alias = "noCheckCert", global = true, env = "MYRA_NO_CHECK_CERT")]
    pub no_check_cert: bool,
}

impl GlobalArgs {
    pub fn verbose(&self) -> bool {
        self.verbosity > 0
    }

    /// Default log filter: info, then debug and trace per extra `-v`
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Credentials and target domain, in the order every command takes them
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Api key to authenticate against the Myracloud API
    pub api_key: String,

    /// Secret to authenticate against the Myracloud API
    pub secret: String,

    /// Domain the command applies to
    pub fqdn: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a DNS record
    #[command(alias = "myracloud:api:dnsRecord")]
    DnsRecord(dns_record::DnsRecordArgs),

    /// Show request, traffic and response code statistics
    #[command(alias = "myracloud:api:statistic")]
    Statistic(statistic::StatisticArgs),

    /// Import the records of a zone file
    #[command(alias = "myracloud:api:zoneImport")]
    ZoneImport(zone_import::ZoneImportArgs),
}

/// Collects the raw option strings handed to the resolver
#[derive(Debug, Default)]
pub(crate) struct RawBuilder(RawOptions);

impl RawBuilder {
    pub fn new(global: &GlobalArgs, target: &Target) -> Self {
        let mut raw = Self::default();
        raw.set("apiKey", Some(&target.api_key));
        raw.set("secret", Some(&target.secret));
        raw.set("fqdn", Some(&target.fqdn));
        raw.set("format", global.format.as_ref());
        raw.set("language", global.language.as_ref());
        raw.set("apiEndpoint", global.api_endpoint.as_ref());
        if global.no_check_cert {
            raw.set("noCheckCert", Some(true));
        }
        raw
    }

    pub fn set<T: ToString>(&mut self, name: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.0.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn build(self) -> RawOptions {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn legacy_command_names_still_work() {
        let cli = Cli::try_parse_from([
            "myra",
            "myracloud:api:zoneImport",
            "-f",
            "zone.conf",
            "key",
            "secret",
            "example.com",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::ZoneImport(_)));
    }

    #[test]
    fn legacy_option_names_and_repeated_verbose() {
        let cli = Cli::try_parse_from([
            "myra",
            "myracloud:api:dnsRecord",
            "--recordName",
            "www",
            "--recordValue",
            "192.0.2.10",
            "--recordType",
            "A",
            "key",
            "secret",
            "example.com",
            "-vvv",
        ])
        .unwrap();

        assert_eq!(cli.global.verbosity, 3);
        assert!(cli.global.verbose());
        assert_eq!(cli.global.log_level(), "trace");
        match cli.command {
            Commands::DnsRecord(args) => {
                assert_eq!(args.record_name.as_deref(), Some("www"));
                assert_eq!(args.record_type.as_deref(), Some("A"));
            }
            other => panic!("expected dns-record, got {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "myra",
            "myracloud:api:statistic",
            "--startDate",
            "2017-12-13 00:00:00",
            "--endDate",
            "2017-12-13 12:00:59",
            "key",
            "secret",
            "example.com",
        ])
        .unwrap();
        match cli.command {
            Commands::Statistic(args) => {
                assert_eq!(args.start_date.as_deref(), Some("2017-12-13 00:00:00"));
                assert_eq!(args.end_date.as_deref(), Some("2017-12-13 12:00:59"));
            }
            other => panic!("expected statistic, got {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "myra",
            "zone-import",
            "--contentFile",
            "zone.conf",
            "key",
            "secret",
            "example.com",
        ])
        .unwrap();
        assert_eq!(cli.global.log_level(), "info");
        match cli.command {
            Commands::ZoneImport(args) => {
                assert_eq!(args.content_file.as_deref(), Some("zone.conf"))
            }
            other => panic!("expected zone-import, got {other:?}"),
        }
    }

    #[test]
    fn raw_options_only_hold_given_values() {
        let global = GlobalArgs {
            language: Some("de".to_string()),
            ..Default::default()
        };
        let target = Target {
            api_key: "key".to_string(),
            secret: "secret".to_string(),
            fqdn: "example.com".to_string(),
        };

        let raw = RawBuilder::new(&global, &target).build();
        assert_eq!(raw.get("language").map(String::as_str), Some("de"));
        assert!(!raw.contains_key("apiEndpoint"));
        assert!(!raw.contains_key("noCheckCert"));
    }
}
