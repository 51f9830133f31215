//! Error types shared by the option pipeline, the zone reader and the API client

use thiserror::Error;

use crate::api::response::Violation;

/// Errors raised before or while talking to the Myracloud API.
///
/// `InvalidArgument`, `UnknownOption`, `UnreadableInput` and `Zone` are all
/// raised before the first remote call of a command.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid value for option '{option}': {reason}")]
    InvalidArgument { option: String, reason: String },

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("could not read file \"{path}\": {reason}")]
    UnreadableInput { path: String, reason: String },

    #[error("zone file line {line}: {reason}")]
    Zone { line: usize, reason: String },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl Error {
    pub fn invalid(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// A failed API call.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("API rejected request: {}", format_violations(.violations))]
    Rejected { violations: Vec<Violation> },

    #[error("unexpected API response: {0}")]
    Decode(String),
}

fn format_violations(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "no details given".to_string();
    }

    violations
        .iter()
        .map(|v| match v.property_path.as_deref() {
            Some(path) if !path.is_empty() => format!("{}: {}", path, v.message),
            _ => v.message.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_names_option() {
        let err = Error::invalid("recordType", "must be one of A, AAAA");
        assert_eq!(
            err.to_string(),
            "invalid value for option 'recordType': must be one of A, AAAA"
        );
    }

    #[test]
    fn rejected_lists_violations() {
        let err = RemoteError::Rejected {
            violations: vec![
                Violation {
                    property_path: Some("value".to_string()),
                    message: "not a valid IPv4 address".to_string(),
                },
                Violation {
                    property_path: None,
                    message: "record exists".to_string(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "API rejected request: value: not a valid IPv4 address, record exists"
        );
    }
}
