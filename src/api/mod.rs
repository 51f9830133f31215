//! API client module

pub mod client;
pub mod response;
pub mod sign;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::RemoteError;
use crate::records::DnsRecordPayload;
use crate::stats::StatisticRequest;

pub use client::MyraClient;
pub use response::ApiResponse;

/// Operation requested from an API resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Create,
    Update,
}

impl ApiMethod {
    /// The API creates with PUT and updates with POST
    pub fn http_method(self) -> Method {
        match self {
            Self::Create => Method::PUT,
            Self::Update => Method::POST,
        }
    }
}

/// Remote operations the commands rely on
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Call the `dnsRecords` resource of a domain
    async fn dns_record(
        &self,
        method: ApiMethod,
        fqdn: &str,
        payload: &DnsRecordPayload,
    ) -> Result<ApiResponse, RemoteError>;

    /// Run a statistic query
    async fn statistic(
        &self,
        method: ApiMethod,
        request: &StatisticRequest,
    ) -> Result<Value, RemoteError>;
}
