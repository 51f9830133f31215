//! HTTP client for the Myracloud API

use anyhow::Result;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

use crate::api::response::{ApiResponse, Violation};
use crate::api::sign::{Signer, CONTENT_TYPE};
use crate::api::{ApiClient, ApiMethod};
use crate::config::Config;
use crate::error::RemoteError;
use crate::records::DnsRecordPayload;
use crate::stats::StatisticRequest;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Myracloud API client
pub struct MyraClient {
    client: Client,
    signer: Signer,
    endpoint: String,
    language: String,
}

impl MyraClient {
    /// Create a new Myracloud API client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("myra-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!config.check_cert)
            .build()?;

        Ok(Self {
            client,
            signer: Signer::new(&config.api_key, &config.secret),
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
        })
    }

    /// Path of a resource below the API root, as it is signed
    fn path(&self, resource: &str) -> String {
        format!("/{}/rapi/{}", self.language, resource)
    }

    /// Send a signed request and return the decoded JSON body
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, RemoteError> {
        let body = serde_json::to_string(body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        let url = format!("https://{}{}", self.endpoint, path);
        let date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        let authorization = self
            .signer
            .authorization(method.as_str(), path, &body, &date);

        debug!("{} {} with body: {}", method, url, body);

        let response = self
            .client
            .request(method, &url)
            .header("Date", date)
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        trace!("Response: {}", text);

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ApiClient for MyraClient {
    async fn dns_record(
        &self,
        method: ApiMethod,
        fqdn: &str,
        payload: &DnsRecordPayload,
    ) -> Result<ApiResponse, RemoteError> {
        let path = self.path(&format!("dnsRecords/{}", fqdn));
        let value = self.send(method.http_method(), &path, payload).await?;

        let response: ApiResponse =
            serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))?;

        if !response.is_success() {
            return Err(RemoteError::Rejected {
                violations: response.violation_list,
            });
        }

        Ok(response)
    }

    async fn statistic(
        &self,
        method: ApiMethod,
        request: &StatisticRequest,
    ) -> Result<Value, RemoteError> {
        let path = self.path("statistic/query");
        let value = self.send(method.http_method(), &path, request).await?;

        check_error_flag(&value)?;
        Ok(value)
    }
}

/// Turn a body flagged with `"error": true` into a rejection
fn check_error_flag(value: &Value) -> Result<(), RemoteError> {
    if value.get("error").and_then(|e| e.as_bool()) != Some(true) {
        return Ok(());
    }

    let violations = value
        .get("violationList")
        .cloned()
        .map(serde_json::from_value::<Vec<Violation>>)
        .transpose()
        .map_err(|e| RemoteError::Decode(e.to_string()))?
        .unwrap_or_default();

    Err(RemoteError::Rejected { violations })
}
