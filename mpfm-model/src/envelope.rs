//! Uniform response envelope used by every API endpoint:
//! `{ success, message, data?, errors? }`.

use serde::{Deserialize, Serialize};

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default, alias = "param", alias = "path")]
    pub field: String,
    #[serde(alias = "msg")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Join validation failures into one line for display.
pub fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| {
            if e.field.is_empty() {
                e.message.clone()
            } else {
                format!("{}: {}", e.field, e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, deserialize_with = "crate::de::null_default", skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: String::new(),
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_success_envelope() {
        let response: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "message": "ok", "data": [1, 2]}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.data, Some(vec![1, 2]));
        assert!(response.errors.is_empty());
    }

    #[test]
    fn null_errors_and_missing_data() {
        let response: ApiResponse<Vec<u32>> =
            serde_json::from_str(r#"{"success": false, "message": "Nope", "errors": null}"#).unwrap();
        assert!(response.data.is_none());
        assert!(response.errors.is_empty());
    }

    #[test]
    fn parses_validation_errors_with_aliases() {
        let response: ApiResponse<()> = serde_json::from_str(
            r#"{"success": false, "message": "Validation failed",
                "errors": [{"param": "email", "msg": "is invalid"}, {"message": "too short"}]}"#,
        )
        .unwrap();
        assert!(!response.success);
        assert_eq!(
            join_field_errors(&response.errors),
            "email: is invalid; too short"
        );
    }
}
