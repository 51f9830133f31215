//! API response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard Myracloud API response envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub violation_list: Vec<Violation>,
    #[serde(default)]
    pub warning_list: Vec<Violation>,
    #[serde(default)]
    pub target_object: Vec<Value>,
}

impl ApiResponse {
    /// Explicit success signal: the API did not flag an error
    pub fn is_success(&self) -> bool {
        !self.error
    }
}

/// A single validation message returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub property_path: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_error_envelope() {
        let body = r#"{
            "error": true,
            "violationList": [{"propertyPath": "value", "message": "invalid ip"}],
            "targetObject": []
        }"#;

        let response: ApiResponse = serde_json::from_str(body).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.violation_list[0].message, "invalid ip");
    }

    #[test]
    fn missing_fields_default_to_success() {
        let response: ApiResponse = serde_json::from_str(r#"{"targetObject": [{"id": 1}]}"#).unwrap();
        assert!(response.is_success());
        assert!(response.warning_list.is_empty());
    }
}
