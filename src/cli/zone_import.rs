//! Zone import command

use anyhow::Result;
use clap::Args;
use std::time::Duration;
use tracing::{debug, info};

use crate::api::{ApiClient, MyraClient};
use crate::batch::{
    BatchReport, BatchSubmitter, Pacer, SubmissionOutcome, TokioPacer, DEFAULT_PACE,
};
use crate::cli::{GlobalArgs, RawBuilder, Target};
use crate::config::Config;
use crate::error::Error;
use crate::options::{
    common_schema, resolve, Normalizer, OptionSchema, OptionSpec, RawOptions, ResolvedOptions,
};
use crate::output;
use crate::records::mapper::SkipReason;
use crate::records::{map_record, DnsRecordPayload, Mapped, RecordDefaults};
use crate::zone::{self, ZoneReader, ZoneRecord};

#[derive(Args, Debug)]
#[command(after_help = "Example:\n  myra zone-import -f zone.conf <API_KEY> <SECRET> <FQDN>")]
pub struct ZoneImportArgs {
    #[command(flatten)]
    pub target: Target,

    /// Zone file with the records to import
    #[arg(short = 'f', long, alias = "contentFile")]
    pub content_file: Option<String>,

    /// Seconds to wait after each created record
    #[arg(long)]
    pub pace: Option<String>,
}

impl ZoneImportArgs {
    fn raw_options(&self, global: &GlobalArgs) -> RawOptions {
        let mut raw = RawBuilder::new(global, &self.target);
        raw.set("contentFile", self.content_file.as_ref())
            .set("pace", self.pace.as_ref());
        raw.build()
    }
}

/// Options of the zone-import command
pub fn schema() -> OptionSchema {
    common_schema()
        .option(OptionSpec::new("contentFile").required())
        .option(
            OptionSpec::new("pace")
                .default_value(DEFAULT_PACE.as_secs().to_string())
                .normalize(Normalizer::Integer),
        )
}

/// Pause between two created records
pub fn pace(options: &ResolvedOptions) -> Result<Duration, Error> {
    options
        .int("pace")
        .and_then(|secs| u64::try_from(secs).ok())
        .map(Duration::from_secs)
        .ok_or_else(|| Error::invalid("pace", "must not be negative"))
}

/// A record left out of the import
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub record_type: String,
    pub name: String,
    pub reason: SkipReason,
}

/// Payloads to submit, in file order, and the records left out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub payloads: Vec<DnsRecordPayload>,
    pub skipped: Vec<Skipped>,
}

/// Map every zone record before anything is sent
pub fn plan(records: &[ZoneRecord], fqdn: &str, defaults: &RecordDefaults) -> ImportPlan {
    let mut plan = ImportPlan::default();

    for record in records {
        debug!(
            "Zone record {} {} ttl={:?}: {:?}",
            record.record_type, record.name, record.ttl, record.rdata
        );

        match map_record(record, fqdn, defaults) {
            Mapped::Record(payload) => plan.payloads.push(payload),
            Mapped::Skip {
                record_type,
                name,
                reason,
            } => plan.skipped.push(Skipped {
                record_type,
                name,
                reason,
            }),
        }
    }

    plan
}

/// Submit a plan, reporting each record as it is processed
pub async fn import<C, P>(
    client: &C,
    submitter: &BatchSubmitter<P>,
    fqdn: &str,
    plan: ImportPlan,
) -> (Vec<SubmissionOutcome>, BatchReport)
where
    C: ApiClient + ?Sized,
    P: Pacer,
{
    for skipped in &plan.skipped {
        output::info(&format!(
            "Skipping {}: {}",
            output::record_label(&skipped.record_type, &skipped.name),
            skipped.reason
        ));
    }

    info!(
        "Importing {} records into {} ({} skipped)",
        plan.payloads.len(),
        fqdn,
        plan.skipped.len()
    );

    let outcomes = submitter
        .submit_with(client, fqdn, plan.payloads, |_, outcome| {
            print_outcome(outcome)
        })
        .await;
    let report = BatchReport::new(&outcomes, plan.skipped.len());

    (outcomes, report)
}

fn print_outcome(outcome: &SubmissionOutcome) {
    let label = output::record_label(&outcome.record.record_type, &outcome.record.name);
    match &outcome.error {
        None => output::success(&format!("Created {} -> {}", label, outcome.record.value)),
        Some(e) => output::error(&format!("Failed {}: {}", label, e)),
    }
}

/// Read, plan and submit the zone file named by resolved options.
///
/// Pace, file and zone text are all checked before the first call.
pub async fn run<C, P>(
    client: &C,
    pacer: P,
    options: &ResolvedOptions,
) -> Result<(Vec<SubmissionOutcome>, BatchReport), Error>
where
    C: ApiClient + ?Sized,
    P: Pacer,
{
    let fqdn = options.require_str("fqdn")?;
    let submitter = BatchSubmitter::with_pacer(pace(options)?, pacer);

    let text = zone::read_zone_file(options.require_str("contentFile")?)?;
    let records = zone::parse_zone(&ZoneReader, fqdn, &text)?;
    let plan = plan(&records, fqdn, &RecordDefaults::default());

    Ok(import(client, &submitter, fqdn, plan).await)
}

pub async fn execute(global: &GlobalArgs, args: ZoneImportArgs) -> Result<()> {
    let options = resolve(&schema(), &args.raw_options(global))?;
    let config = Config::from_options(&options)?;

    let client = MyraClient::new(&config)?;
    let (outcomes, report) = run(&client, TokioPacer, &options).await?;

    if global.verbose() {
        for outcome in outcomes.iter().filter_map(|o| o.response.as_ref()) {
            output::print_output(outcome, &config.output_format)?;
        }
    }

    let summary = format!(
        "{} created, {} failed, {} skipped",
        report.succeeded, report.failed, report.skipped
    );
    if report.failed > 0 {
        output::warning(&summary);
    } else {
        output::info(&summary);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::tests::{Event, FakeClient, Log, RecordingPacer};
    use std::io::Write;

    fn import_text(text: &str) -> ImportPlan {
        let records = zone::parse_zone(&ZoneReader, "example.com", text).unwrap();
        plan(&records, "example.com", &RecordDefaults::default())
    }

    #[test]
    fn plan_keeps_file_order_and_collects_skips() {
        let plan = import_text(
            "@ IN A 1.2.3.4\n\
             @ IN MX 20 mail.example.com.\n\
             _sip._tcp IN SRV 10 60 5060 sip.example.com.\n\
             @ IN NS ns1.example.net.\n",
        );

        let types: Vec<&str> = plan.payloads.iter().map(|p| p.record_type.as_str()).collect();
        assert_eq!(types, ["A", "MX", "NS"]);
        assert_eq!(plan.payloads[1].priority, 20);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].record_type, "SRV");
        assert_eq!(plan.skipped[0].reason, SkipReason::UnsupportedType);
    }

    #[tokio::test]
    async fn imports_zone_text_end_to_end() {
        let plan = import_text("@ A 1.2.3.4\nwww CNAME @\ntxt TXT \"v=spf1\"\n");

        assert_eq!(plan.payloads.len(), 2);
        assert_eq!(plan.payloads[0].name, "");
        assert_eq!(plan.payloads[1].name, "www");
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].record_type, "TXT");

        let log = Log::default();
        let client = FakeClient::new(log.clone());
        let submitter = BatchSubmitter::with_pacer(DEFAULT_PACE, RecordingPacer(log.clone()));

        let (outcomes, report) = import(&client, &submitter, "example.com", plan).await;

        assert!(outcomes.iter().all(|o| o.success));
        assert_eq!(
            report,
            BatchReport {
                submitted: 2,
                succeeded: 2,
                failed: 0,
                skipped: 1,
            }
        );
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Event::Call("1.2.3.4".to_string()),
                Event::Pause(Duration::from_secs(1)),
                Event::Call("@".to_string()),
            ]
        );
    }

    fn raw(pairs: &[(&str, &str)]) -> RawOptions {
        [("apiKey", "key"), ("secret", "secret"), ("fqdn", "example.com")]
            .iter()
            .chain(pairs)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn content_file_is_required() {
        match resolve(&schema(), &raw(&[])) {
            Err(Error::InvalidArgument { option, .. }) => assert_eq!(option, "contentFile"),
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn pace_defaults_to_one_second() {
        let options = resolve(&schema(), &raw(&[("contentFile", "zone.conf")])).unwrap();
        assert_eq!(pace(&options).unwrap(), Duration::from_secs(1));

        let options = resolve(
            &schema(),
            &raw(&[("contentFile", "zone.conf"), ("pace", "0")]),
        )
        .unwrap();
        assert_eq!(pace(&options).unwrap(), Duration::ZERO);
    }

    #[test]
    fn negative_pace_is_rejected() {
        let options = resolve(
            &schema(),
            &raw(&[("contentFile", "zone.conf"), ("pace", "-2")]),
        )
        .unwrap();
        assert!(matches!(
            pace(&options),
            Err(Error::InvalidArgument { ref option, .. }) if option == "pace"
        ));
    }

    fn zone_file(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    async fn run_with(pairs: &[(&str, &str)]) -> (Log, Result<BatchReport, Error>) {
        let log = Log::default();
        let client = FakeClient::new(log.clone());
        let options = resolve(&schema(), &raw(pairs)).unwrap();

        let result = run(&client, RecordingPacer(log.clone()), &options)
            .await
            .map(|(_, report)| report);
        (log, result)
    }

    fn calls(log: &Log) -> usize {
        log.lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Event::Call(_)))
            .count()
    }

    #[tokio::test]
    async fn unreadable_file_stops_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.zone");

        let (log, result) = run_with(&[("contentFile", missing.to_str().unwrap())]).await;

        assert!(matches!(result, Err(Error::UnreadableInput { .. })));
        assert_eq!(calls(&log), 0);
    }

    #[tokio::test]
    async fn malformed_zone_stops_before_any_call() {
        let file = zone_file("@ A 1.2.3.4\nwww MX 10\n");

        let (log, result) = run_with(&[("contentFile", file.path().to_str().unwrap())]).await;

        assert!(matches!(result, Err(Error::Zone { line: 2, .. })));
        assert_eq!(calls(&log), 0);
    }

    #[tokio::test]
    async fn negative_pace_stops_before_any_call() {
        let file = zone_file("@ A 1.2.3.4\n");

        let (log, result) = run_with(&[
            ("contentFile", file.path().to_str().unwrap()),
            ("pace", "-1"),
        ])
        .await;

        assert!(matches!(
            result,
            Err(Error::InvalidArgument { ref option, .. }) if option == "pace"
        ));
        assert_eq!(calls(&log), 0);
    }

    #[tokio::test]
    async fn absolute_owners_are_sent_relative_to_the_domain() {
        let log = Log::default();
        let client = FakeClient::new(log.clone());
        let file = zone_file("example.com. A 5.6.7.8\nwww.example.com. A 9.9.9.9\n");
        let options = resolve(
            &schema(),
            &raw(&[("contentFile", file.path().to_str().unwrap()), ("pace", "0")]),
        )
        .unwrap();

        let (outcomes, report) = run(&client, RecordingPacer(log.clone()), &options)
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        let names: Vec<&str> = outcomes.iter().map(|o| o.record.name.as_str()).collect();
        assert_eq!(names, ["", "www"]);
        assert_eq!(calls(&log), 2);
    }
}
