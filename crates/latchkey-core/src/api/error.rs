use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Fallback message when the device returns an error body without a
/// `message` field.
const GENERIC_FAILURE_MESSAGE: &str = "API request failed";

/// Error body the firmware sends alongside non-success statuses.
/// Both fields are optional; older firmware omits `code` entirely.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-success HTTP status from the device, carrying the best-effort
    /// human-readable message extracted from the response body.
    #[error("{message}")]
    Device {
        status: StatusCode,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Success-status response whose body was not valid JSON for the
    /// expected type.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("credential is not a valid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl ApiError {
    /// Normalize a non-success response into a single error message.
    ///
    /// The body is expected to be `{code?, message?}` JSON. An unparsable
    /// or empty body yields `HTTP error <status>`; a parsed body without a
    /// `message` field yields a generic fallback.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed
                .message
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            Err(_) => format!("HTTP error {}", status.as_u16()),
        };
        ApiError::Device { status, message }
    }

    /// True when the device rejected the credential (or lack of one).
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::Device {
                status: StatusCode::UNAUTHORIZED,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_extracted_from_body() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"message":"not found"}"#);
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn test_unparsable_body_falls_back_to_status() {
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.to_string(), "HTTP error 500");

        // Empty body is also unparsable
        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.to_string(), "HTTP error 500");
    }

    #[test]
    fn test_body_without_message_uses_generic_fallback() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"code":"invalid_json"}"#);
        assert_eq!(err.to_string(), "API request failed");
    }

    #[test]
    fn test_firmware_error_shape_parses_both_fields() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"code":"invalid_type","message":"Invalid enrollment type specified"}"#,
        );
        assert_eq!(err.to_string(), "Invalid enrollment type specified");
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::from_status(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_unauthorized());

        let err = ApiError::from_status(StatusCode::NOT_FOUND, "");
        assert!(!err.is_unauthorized());
    }
}
