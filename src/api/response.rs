//! API response types
//!
//! `{"status":"ok","response":<payload>}` or
//! `{"status":"error","error":"<message>"}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::ApiError;

/// Success response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub status: String,
    pub response: Value,
}

impl SuccessResponse {
    /// Create a new success response
    pub fn new(response: Value) -> Self {
        Self {
            status: "ok".to_string(),
            response,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("SuccessResponse serialization cannot fail")
    }
}

/// Error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
    /// Subsystem code; kept for logging, not sent
    #[serde(skip)]
    pub code: String,
}

impl ErrorResponse {
    /// Create from an API error
    pub fn from_error(err: &ApiError) -> Self {
        Self {
            status: "error".to_string(),
            error: err.message().to_string(),
            code: err.code().to_string(),
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("ErrorResponse serialization cannot fail")
    }
}

/// Unified response type
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success(SuccessResponse),
    Error(ErrorResponse),
}

impl Response {
    /// Create a success response
    pub fn success(response: Value) -> Self {
        Response::Success(SuccessResponse::new(response))
    }

    /// Create an error response
    pub fn error(err: &ApiError) -> Self {
        Response::Error(ErrorResponse::from_error(err))
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        match self {
            Response::Success(r) => r.to_json(),
            Response::Error(r) => r.to_json(),
        }
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success(_))
    }

    /// Payload of a success response
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Response::Success(r) => Some(&r.response),
            Response::Error(_) => None,
        }
    }

    /// Message of an error response
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Response::Success(_) => None,
            Response::Error(r) => Some(&r.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let resp = Response::success(json!({"value": "v", "status": "ok"}));
        let parsed: Value = serde_json::from_str(&resp.to_json()).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["response"]["value"], "v");
    }

    #[test]
    fn test_null_payload_is_kept() {
        let json = Response::success(Value::Null).to_json();
        assert_eq!(json, r#"{"status":"ok","response":null}"#);
    }

    #[test]
    fn test_error_response() {
        let err = ApiError::invalid_request("bad line");
        let json = Response::error(&err).to_json();
        assert_eq!(json, r#"{"status":"error","error":"bad line"}"#);
    }
}
