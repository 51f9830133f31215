//! Sequential record submission with pacing between calls

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiMethod, ApiResponse};
use crate::error::RemoteError;
use crate::records::DnsRecordPayload;

/// Pause after each successful call; keeps under the API rate limit
pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

/// Waits between two submissions
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// Pacer backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Result of submitting one record
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub record: DnsRecordPayload,
    pub success: bool,
    pub response: Option<ApiResponse>,
    pub error: Option<RemoteError>,
}

/// Counts for the end-of-import summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchReport {
    pub fn new(outcomes: &[SubmissionOutcome], skipped: usize) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Self {
            submitted: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            skipped,
        }
    }
}

/// Submits records one after another.
///
/// A failed record is recorded and the batch moves on; only successful calls
/// are followed by a pause.
pub struct BatchSubmitter<P = TokioPacer> {
    pace: Duration,
    pacer: P,
}

impl<P: Pacer> BatchSubmitter<P> {
    pub fn with_pacer(pace: Duration, pacer: P) -> Self {
        Self { pace, pacer }
    }

    /// Submit every record in order and return one outcome per record
    pub async fn submit<C>(
        &self,
        client: &C,
        fqdn: &str,
        records: Vec<DnsRecordPayload>,
    ) -> Vec<SubmissionOutcome>
    where
        C: ApiClient + ?Sized,
    {
        self.submit_with(client, fqdn, records, |_, _| {}).await
    }

    /// Like [`submit`](Self::submit), reporting each outcome as it happens
    pub async fn submit_with<C, F>(
        &self,
        client: &C,
        fqdn: &str,
        records: Vec<DnsRecordPayload>,
        mut on_outcome: F,
    ) -> Vec<SubmissionOutcome>
    where
        C: ApiClient + ?Sized,
        F: FnMut(usize, &SubmissionOutcome),
    {
        let total = records.len();
        let mut outcomes = Vec::with_capacity(total);

        for (idx, record) in records.into_iter().enumerate() {
            debug!(
                "Submitting {}/{}: {} {:?} -> {}",
                idx + 1,
                total,
                record.record_type,
                record.name,
                record.value
            );

            let outcome = match client.dns_record(ApiMethod::Create, fqdn, &record).await {
                Ok(response) => SubmissionOutcome {
                    record,
                    success: true,
                    response: Some(response),
                    error: None,
                },
                Err(e) => {
                    warn!("Record {} {:?} failed: {}", record.record_type, record.name, e);
                    SubmissionOutcome {
                        record,
                        success: false,
                        response: None,
                        error: Some(e),
                    }
                }
            };

            on_outcome(idx, &outcome);
            let pause = outcome.success && idx + 1 < total;
            outcomes.push(outcome);

            if pause {
                self.pacer.pause(self.pace).await;
            }
        }

        outcomes
    }
}
