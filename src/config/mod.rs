//! Connection settings taken from the resolved command options

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::ResolvedOptions;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key, sent in the Authorization header
    pub api_key: String,

    /// Secret used to sign requests
    #[serde(skip_serializing)]
    pub secret: String,

    /// API host name
    pub endpoint: String,

    /// Language segment of every API path
    pub language: String,

    /// Verify the server certificate
    pub check_cert: bool,

    /// Output format
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Config {
    /// Build the configuration from options every command schema carries
    pub fn from_options(options: &ResolvedOptions) -> Result<Self> {
        let output_format = match options.str("format") {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Table,
        };

        Ok(Self {
            api_key: options.require_str("apiKey")?.to_string(),
            secret: options.require_str("secret")?.to_string(),
            endpoint: options.require_str("apiEndpoint")?.to_string(),
            language: options.require_str("language")?.to_string(),
            check_cert: !options.flag("noCheckCert"),
            output_format,
        })
    }
}
