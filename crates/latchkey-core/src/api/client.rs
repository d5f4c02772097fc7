//! API client for the door-access controller.
//!
//! This module provides the `DeviceClient` struct for making authenticated
//! requests against the controller's JSON API: settings, biometric
//! enrollments, the captured event log, and system operations.

use std::time::Duration;

use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::models::enrollment::EnrollmentRequest;
use crate::models::{
    Ack, DeviceSettings, Enrollment, EnrollmentKind, EnrollmentList, EnrollmentStatus,
    FirmwareInfo, LogEntry,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Fixed root segment every API path hangs off. Callers supply only the
/// remaining path.
const API_ROOT: &str = "/api";

/// HTTP request timeout in seconds.
/// The controller answers from the local network; 10s covers a slow
/// enrollment-busy device while still failing fast when it is unreachable.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// API client for the controller.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct DeviceClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl DeviceClient {
    /// Create a new client for the controller at `base_url`.
    ///
    /// `token` is the stored Basic credential; `None` means every request
    /// goes out unauthenticated, which the device accepts when it has no
    /// credentials configured.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create a client with a different token, sharing the connection pool.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_ROOT, path)
    }

    /// Header set for the next request: exactly one `Authorization: Basic`
    /// entry when a token is present, empty otherwise.
    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Basic {}", token))?,
            );
        }
        Ok(headers)
    }

    /// Check if a response is successful, normalizing failures into a
    /// single error message from the `{code?, message?}` body.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<T, ApiError> {
        let url = self.api_url(path);
        debug!(%method, %url, "Device request");

        let mut request = self
            .client
            .request(method, &url)
            .headers(self.auth_headers()?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = Self::check_response(request.send().await?).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(ApiError::Decode)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, None::<&()>).await
    }

    // ===== Settings =====

    pub async fn fetch_settings(&self) -> Result<DeviceSettings, ApiError> {
        self.get("/settings").await
    }

    /// Apply a settings update. Only the keys present in `update` change
    /// on the device.
    pub async fn update_settings(&self, update: &DeviceSettings) -> Result<Ack, ApiError> {
        self.post("/settings", update).await
    }

    // ===== Enrollment workflow =====

    /// Start enrolling a new fingerprint or face under `user_name`.
    /// The device walks the person through the scan steps; poll
    /// [`enrollment_status`](Self::enrollment_status) for progress.
    pub async fn start_enrollment(
        &self,
        kind: EnrollmentKind,
        user_name: &str,
    ) -> Result<EnrollmentRequest, ApiError> {
        let body = EnrollmentRequest {
            kind,
            user_name: user_name.to_string(),
        };
        self.post("/enrollment", &body).await
    }

    pub async fn enrollment_status(&self) -> Result<EnrollmentStatus, ApiError> {
        self.get("/enrollment").await
    }

    pub async fn cancel_enrollment(&self) -> Result<Ack, ApiError> {
        self.delete("/enrollment").await
    }

    // ===== Enrollment records =====

    pub async fn list_enrollments(
        &self,
        kind: EnrollmentKind,
    ) -> Result<Vec<Enrollment>, ApiError> {
        let list: EnrollmentList = self
            .get(&format!("/enrollments/{}", kind.as_path()))
            .await?;
        Ok(list.items)
    }

    pub async fn set_enrollment_enabled(
        &self,
        kind: EnrollmentKind,
        id: u32,
        enabled: bool,
    ) -> Result<Ack, ApiError> {
        self.post(
            &format!("/enrollments/{}/{}", kind.as_path(), id),
            &serde_json::json!({ "enabled": enabled }),
        )
        .await
    }

    pub async fn delete_enrollment(&self, kind: EnrollmentKind, id: u32) -> Result<Ack, ApiError> {
        self.delete(&format!("/enrollments/{}/{}", kind.as_path(), id))
            .await
    }

    /// Remove every record of the given kind, from the sensor and the
    /// device table both.
    pub async fn clear_enrollments(&self, kind: EnrollmentKind) -> Result<Ack, ApiError> {
        self.delete(&format!("/enrollments/{}", kind.as_path()))
            .await
    }

    // ===== Event log =====

    /// Fetch captured log entries. `from_index` resumes after the last
    /// entry already seen; 0 fetches from the oldest retained entry.
    pub async fn fetch_log(&self, from_index: u64) -> Result<Vec<LogEntry>, ApiError> {
        if from_index == 0 {
            self.get("/log").await
        } else {
            self.get(&format!("/log?from_index={}", from_index)).await
        }
    }

    // ===== System =====

    pub async fn firmware_info(&self) -> Result<FirmwareInfo, ApiError> {
        self.get("/system/firmware").await
    }

    pub async fn reboot(&self) -> Result<Ack, ApiError> {
        self.post("/system/reboot", &serde_json::json!({})).await
    }

    /// Capture and download a camera snapshot (raw JPEG bytes).
    pub async fn fetch_photo(&self) -> Result<Vec<u8>, ApiError> {
        let url = self.api_url("/photo");
        debug!(%url, "Device photo request");

        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers()?)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Liveness probe. `/ping` sits outside the `/api` root and never
    /// requires auth.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let url = format!("{}/ping", self.base_url);
        let response = self.client.get(&url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::from_status(response.status(), ""))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(token: Option<&str>) -> DeviceClient {
        DeviceClient::new("http://door.local/", token.map(String::from))
            .expect("client should build")
    }

    #[test]
    fn test_no_token_means_no_authorization_header() {
        let headers = client(None).auth_headers().expect("headers should build");
        assert!(!headers.contains_key(header::AUTHORIZATION));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_token_becomes_basic_authorization_header() {
        let headers = client(Some("abc123"))
            .auth_headers()
            .expect("headers should build");
        assert_eq!(
            headers.get(header::AUTHORIZATION).map(|v| v.to_str().unwrap()),
            Some("Basic abc123")
        );
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_control_characters_in_token_are_rejected() {
        let result = client(Some("abc\n123")).auth_headers();
        assert!(matches!(result, Err(ApiError::InvalidHeader(_))));
    }

    #[test]
    fn test_api_urls_share_the_fixed_root() {
        let client = client(None);
        // Trailing slash on the base URL is normalized away
        assert_eq!(client.base_url(), "http://door.local");
        assert_eq!(client.api_url("/settings"), "http://door.local/api/settings");
        assert_eq!(
            client.api_url("/enrollments/fingerprint/4"),
            "http://door.local/api/enrollments/fingerprint/4"
        );
    }

    #[test]
    fn test_success_body_decodes_into_caller_type() {
        // The decode half of the fetch contract, without a socket:
        // a success-status body is parsed as JSON into the caller's type.
        #[derive(serde::Deserialize)]
        struct Flag {
            ok: bool,
        }

        let decoded: Flag = serde_json::from_str(r#"{"ok":true}"#).expect("body should decode");
        assert!(decoded.ok);

        let err = serde_json::from_str::<Flag>("not json").map_err(ApiError::Decode);
        assert!(matches!(err, Err(ApiError::Decode(_))));
    }
}
