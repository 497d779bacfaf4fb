//! API Response types
//!
//! The order service wraps every payload in a numeric-code envelope:
//! ```json
//! {
//!     "code": 0,
//!     "msg": "Success",
//!     "data": { ... }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Envelope code signalling success
pub const API_CODE_SUCCESS: i64 = 0;

/// Backend response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Response code (0 = success, anything else = backend failure)
    pub code: i64,
    /// Human-readable message; some endpoints name it `message`
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            code: API_CODE_SUCCESS,
            msg: Some("Success".to_string()),
            data: Some(data),
        }
    }

    /// Create an error envelope
    pub fn error(code: i64, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: Some(msg.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == API_CODE_SUCCESS
    }

    /// Unwrap the payload, turning a non-zero code or a missing payload
    /// into the backend's message.
    pub fn into_result(self) -> Result<T, String> {
        if !self.is_success() {
            return Err(self
                .msg
                .unwrap_or_else(|| format!("Backend returned code {}", self.code)));
        }
        self.data
            .ok_or_else(|| "Response envelope is missing data".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_unwraps_data() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"code":0,"msg":"ok","data":[1,2]}"#).unwrap();
        assert!(env.is_success());
        assert_eq!(env.into_result().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_envelope_error_uses_message_alias() {
        let env: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"code":7,"message":"restaurant closed"}"#).unwrap();
        assert_eq!(env.into_result().unwrap_err(), "restaurant closed");
    }

    #[test]
    fn test_envelope_error_without_message() {
        let env: ApiEnvelope<u32> = serde_json::from_str(r#"{"code":500}"#).unwrap();
        assert_eq!(env.into_result().unwrap_err(), "Backend returned code 500");
    }

    #[test]
    fn test_envelope_success_without_data() {
        let env: ApiEnvelope<u32> = serde_json::from_str(r#"{"code":0}"#).unwrap();
        assert!(env.into_result().is_err());
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Ticket {
        id: String,
    }

    #[test]
    fn test_envelope_payload_without_default() {
        let env: ApiEnvelope<Ticket> =
            serde_json::from_str(r#"{"code":0,"data":{"id":"t1"}}"#).unwrap();
        assert_eq!(env.into_result().unwrap(), Ticket { id: "t1".into() });

        let failed: ApiEnvelope<Ticket> =
            serde_json::from_str(r#"{"code":2,"msg":"gone"}"#).unwrap();
        assert_eq!(failed.into_result().unwrap_err(), "gone");
    }
}
