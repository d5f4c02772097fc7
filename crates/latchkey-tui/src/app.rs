//! Application state management for Latchkey.
//!
//! This module contains the core `App` struct that manages UI state, the
//! device client, the notification board, and background task coordination.

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use latchkey_core::models::{
    Ack, DeviceSettings, Enrollment, EnrollmentKind, EnrollmentStatus, FirmwareInfo, LogEntry,
};
use latchkey_core::{encode_basic_token, ApiError, Config, CredentialStore, DeviceClient};

use crate::notify::NoticeBoard;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// A full refresh produces ~6 messages; 32 leaves headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Fallback device URL when none is configured.
/// The controller's own access-point mode answers on this address.
const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";

/// Maximum length for the login username field.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for the login password field.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for an enrollment name; the device truncates at 31 bytes.
const MAX_ENROLL_NAME_LENGTH: usize = 31;

/// How often to poll `GET /api/enrollment` while an enrollment is running.
const ENROLL_POLL_INTERVAL: Duration = Duration::from_millis(1000);

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Enrollments,
    Activity,
    Settings,
    System,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Enrollments => "Enrollments",
            Tab::Activity => "Activity",
            Tab::Settings => "Settings",
            Tab::System => "System",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Enrollments => Tab::Activity,
            Tab::Activity => Tab::Settings,
            Tab::Settings => Tab::System,
            Tab::System => Tab::Enrollments,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Enrollments => Tab::System,
            Tab::Activity => Tab::Enrollments,
            Tab::Settings => Tab::Activity,
            Tab::System => Tab::Settings,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    EnteringName,
    ShowingHelp,
    ConfirmingQuit,
    ConfirmingClear,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background fetch tasks, sent back to the main loop
/// through an MPSC channel.
enum FetchResult {
    /// Enrollment records for one kind
    Enrollments(EnrollmentKind, Vec<Enrollment>),
    /// Captured log entries starting at the requested cursor
    Log(Vec<LogEntry>),
    /// The device settings table
    Settings(DeviceSettings),
    /// Firmware/build information
    Firmware(FirmwareInfo),
    /// Progress of a running enrollment
    EnrollStatus(EnrollmentStatus),
    /// A mutation was acknowledged; the message is shown as a success notice
    Acked(String),
    /// The device rejected the credential
    AuthRequired,
    /// All refresh tasks have completed
    RefreshComplete,
    /// An error occurred during a background task
    Error(String),
}

impl FetchResult {
    fn from_err(err: ApiError) -> Self {
        if err.is_unauthorized() {
            FetchResult::AuthRequired
        } else {
            FetchResult::Error(err.to_string())
        }
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub client: DeviceClient,
    pub notices: NoticeBoard,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Enrollments tab state
    pub enroll_kind: EnrollmentKind,
    pub enroll_selection: usize,
    pub fingerprints: Vec<Enrollment>,
    pub faces: Vec<Enrollment>,
    pub enroll_status: EnrollmentStatus,
    pub enroll_name_input: String,
    last_enroll_poll: Instant,

    // Activity tab state
    pub log_entries: Vec<LogEntry>,
    pub log_selection: usize,

    // Settings / System tab state
    pub settings: DeviceSettings,
    pub settings_selection: usize,
    pub firmware: FirmwareInfo,

    pub refreshing: bool,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
}

impl App {
    /// Create a new application instance. Reads the stored credential
    /// once, here at the boundary; the client carries it from then on.
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let token = match CredentialStore::load() {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "Failed to read keychain, starting unauthenticated");
                None
            }
        };
        debug!(has_token = token.is_some(), "Credential loaded");

        let device_url = config
            .device_url
            .clone()
            .unwrap_or_else(|| DEFAULT_DEVICE_URL.to_string());
        let force_login = !config.allow_anonymous && token.is_none();
        let client = DeviceClient::new(&device_url, token)?;

        let notices = NoticeBoard::new(Duration::from_millis(config.notice_ttl_ms));
        let (fetch_tx, fetch_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            config,
            client,
            notices,
            state: if force_login {
                AppState::LoggingIn
            } else {
                AppState::Normal
            },
            current_tab: Tab::Enrollments,
            login_username: String::new(),
            login_password: String::new(),
            login_focus: LoginFocus::Username,
            login_error: None,
            enroll_kind: EnrollmentKind::Fingerprint,
            enroll_selection: 0,
            fingerprints: Vec::new(),
            faces: Vec::new(),
            enroll_status: EnrollmentStatus::default(),
            enroll_name_input: String::new(),
            last_enroll_poll: Instant::now(),
            log_entries: Vec::new(),
            log_selection: 0,
            settings: DeviceSettings::default(),
            settings_selection: 0,
            firmware: FirmwareInfo::default(),
            refreshing: false,
            fetch_rx,
            fetch_tx,
        })
    }

    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if tx.send(result).await.is_err() {
            debug!("Fetch channel closed, dropping result");
        }
    }

    /// The enrollment list currently shown.
    pub fn visible_enrollments(&self) -> &[Enrollment] {
        match self.enroll_kind {
            EnrollmentKind::Fingerprint => &self.fingerprints,
            EnrollmentKind::Face => &self.faces,
        }
    }

    pub fn selected_enrollment(&self) -> Option<&Enrollment> {
        self.visible_enrollments().get(self.enroll_selection)
    }

    // ========================================================================
    // Background refresh
    // ========================================================================

    /// Refresh everything the UI shows, in the background.
    pub fn refresh_all(&mut self) {
        if self.refreshing {
            return;
        }
        self.refreshing = true;

        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            // The two record lists are independent; fetch them together
            let (fingerprints, faces) = futures::future::join(
                client.list_enrollments(EnrollmentKind::Fingerprint),
                client.list_enrollments(EnrollmentKind::Face),
            )
            .await;

            match fingerprints {
                Ok(items) => {
                    Self::send_result(&tx, FetchResult::Enrollments(
                        EnrollmentKind::Fingerprint,
                        items,
                    ))
                    .await
                }
                Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
            }
            match faces {
                Ok(items) => {
                    Self::send_result(&tx, FetchResult::Enrollments(EnrollmentKind::Face, items))
                        .await
                }
                Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
            }

            match client.fetch_log(0).await {
                Ok(entries) => Self::send_result(&tx, FetchResult::Log(entries)).await,
                Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
            }
            match client.fetch_settings().await {
                Ok(settings) => Self::send_result(&tx, FetchResult::Settings(settings)).await,
                Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
            }
            match client.firmware_info().await {
                Ok(info) => Self::send_result(&tx, FetchResult::Firmware(info)).await,
                Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
            }

            Self::send_result(&tx, FetchResult::RefreshComplete).await;
        });
    }

    /// Spawn a mutation; the `Ack` message becomes a success notice and a
    /// refresh is triggered when the result arrives.
    fn spawn_mutation<F>(&self, fut: F)
    where
        F: std::future::Future<Output = Result<Ack, ApiError>> + Send + 'static,
    {
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match fut.await {
                Ok(ack) => Self::send_result(&tx, FetchResult::Acked(ack.message)).await,
                Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
            }
        });
    }

    /// Drain completed background tasks and poll a running enrollment.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.apply_fetch_result(result);
        }

        if self.enroll_status.is_active() && self.last_enroll_poll.elapsed() >= ENROLL_POLL_INTERVAL
        {
            self.last_enroll_poll = Instant::now();
            let client = self.client.clone();
            let tx = self.fetch_tx.clone();
            tokio::spawn(async move {
                match client.enrollment_status().await {
                    Ok(status) => Self::send_result(&tx, FetchResult::EnrollStatus(status)).await,
                    Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
                }
            });
        }
    }

    fn apply_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Enrollments(EnrollmentKind::Fingerprint, items) => {
                self.fingerprints = items;
                self.clamp_enroll_selection();
            }
            FetchResult::Enrollments(EnrollmentKind::Face, items) => {
                self.faces = items;
                self.clamp_enroll_selection();
            }
            FetchResult::Log(entries) => {
                self.log_entries = entries;
                if self.log_selection >= self.log_entries.len() {
                    self.log_selection = self.log_entries.len().saturating_sub(1);
                }
            }
            FetchResult::Settings(settings) => self.settings = settings,
            FetchResult::Firmware(info) => self.firmware = info,
            FetchResult::EnrollStatus(status) => {
                let finished = self.enroll_status.is_active() && !status.is_active();
                self.enroll_status = status;
                if finished {
                    self.notices.success("Enrollment finished");
                    self.refresh_all();
                }
            }
            FetchResult::Acked(message) => {
                self.notices.success(message);
                self.refresh_all();
            }
            FetchResult::AuthRequired => {
                warn!("Device rejected credential");
                if !matches!(self.state, AppState::LoggingIn) {
                    self.start_login();
                    self.login_error = Some("Device requires login".to_string());
                }
            }
            FetchResult::RefreshComplete => {
                self.refreshing = false;
            }
            FetchResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                self.notices.error(Self::user_message(&msg));
            }
        }
    }

    /// Simplify common transport failures for display; device-provided
    /// messages pass through untouched.
    fn user_message(msg: &str) -> String {
        let lower = msg.to_lowercase();
        if lower.contains("network error") || lower.contains("connect") {
            "Network error. Check your connection.".to_string()
        } else if lower.contains("timed out") {
            "Device not responding.".to_string()
        } else {
            msg.to_string()
        }
    }

    fn clamp_enroll_selection(&mut self) {
        let len = self.visible_enrollments().len();
        if self.enroll_selection >= len {
            self.enroll_selection = len.saturating_sub(1);
        }
    }

    // ========================================================================
    // Enrollment actions
    // ========================================================================

    pub fn toggle_selected_enrollment(&mut self) {
        let Some(record) = self.selected_enrollment() else {
            return;
        };
        let (kind, id, enabled) = (self.enroll_kind, record.id, !record.enabled);
        let client = self.client.clone();
        self.spawn_mutation(async move { client.set_enrollment_enabled(kind, id, enabled).await });
    }

    pub fn delete_selected_enrollment(&mut self) {
        let Some(record) = self.selected_enrollment() else {
            return;
        };
        let (kind, id) = (self.enroll_kind, record.id);
        let client = self.client.clone();
        self.spawn_mutation(async move { client.delete_enrollment(kind, id).await });
    }

    /// Clear every record of the visible kind. Guarded by the
    /// `ConfirmingClear` overlay before it reaches this point.
    pub fn clear_visible_enrollments(&mut self) {
        let kind = self.enroll_kind;
        let client = self.client.clone();
        self.spawn_mutation(async move { client.clear_enrollments(kind).await });
    }

    pub fn start_enrollment(&mut self) {
        let name = self.enroll_name_input.trim().to_string();
        if name.is_empty() {
            self.notices.error("Enrollment needs a name");
            return;
        }
        self.enroll_name_input.clear();

        let kind = self.enroll_kind;
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match client.start_enrollment(kind, &name).await {
                Ok(accepted) => {
                    Self::send_result(
                        &tx,
                        FetchResult::Acked(format!(
                            "Enrolling {} for {}",
                            accepted.kind.as_path(),
                            accepted.user_name
                        )),
                    )
                    .await;
                    // Seed the poller right away
                    match client.enrollment_status().await {
                        Ok(status) => {
                            Self::send_result(&tx, FetchResult::EnrollStatus(status)).await
                        }
                        Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
                    }
                }
                Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
            }
        });
    }

    pub fn cancel_enrollment(&mut self) {
        let client = self.client.clone();
        self.spawn_mutation(async move { client.cancel_enrollment().await });
        self.enroll_status = EnrollmentStatus::default();
    }

    pub fn reboot_device(&mut self) {
        let client = self.client.clone();
        self.spawn_mutation(async move { client.reboot().await });
    }

    /// Flip the boolean setting under the cursor, if it is one.
    pub fn toggle_selected_setting(&mut self) {
        let rows = self.settings.display_rows();
        let Some((key, _)) = rows.get(self.settings_selection) else {
            return;
        };
        let Some(update) = self.settings.toggle_update(key) else {
            self.notices.error("Not a toggleable setting");
            return;
        };
        let client = self.client.clone();
        self.spawn_mutation(async move { client.update_settings(&update).await });
    }

    /// Capture a camera snapshot and save it next to the terminal session.
    pub fn capture_photo(&mut self) {
        let client = self.client.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match client.fetch_photo().await {
                Ok(bytes) => {
                    let path = std::env::temp_dir().join("latchkey-snapshot.jpg");
                    match std::fs::write(&path, &bytes) {
                        Ok(()) => {
                            Self::send_result(
                                &tx,
                                FetchResult::Acked(format!(
                                    "Snapshot saved to {}",
                                    path.display()
                                )),
                            )
                            .await
                        }
                        Err(e) => {
                            Self::send_result(
                                &tx,
                                FetchResult::Error(format!("Failed to save snapshot: {}", e)),
                            )
                            .await
                        }
                    }
                }
                Err(e) => Self::send_result(&tx, FetchResult::from_err(e)).await,
            }
        });
    }

    // ========================================================================
    // Login / logout
    // ========================================================================

    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_username.clear();
        self.login_password.clear();
        self.login_focus = LoginFocus::Username;
        self.login_error = None;
    }

    /// Mint the Basic token from the form, persist it, and rebuild the
    /// client around it.
    pub fn submit_login(&mut self) {
        if self.login_username.is_empty() {
            self.login_error = Some("Username is required".to_string());
            return;
        }

        let token = encode_basic_token(&self.login_username, &self.login_password);
        if let Err(e) = CredentialStore::store(&token) {
            // Keychain failures degrade to a session-only credential
            warn!(error = %e, "Failed to persist credential, keeping it for this session");
            self.notices.error("Credential not saved to keychain");
        }

        self.client = self.client.with_token(Some(token));
        self.login_password.clear();
        self.state = AppState::Normal;
        self.notices.success("Logged in");
        self.refresh_all();
    }

    pub fn logout(&mut self) {
        if let Err(e) = CredentialStore::clear() {
            warn!(error = %e, "Failed to clear stored credential");
        }
        self.client = self.client.with_token(None);
        self.notices.success("Logged out");
        if !self.config.allow_anonymous {
            self.start_login();
        }
    }

    pub fn can_add_username_char(&self) -> bool {
        self.login_username.len() < MAX_USERNAME_LENGTH
    }

    pub fn can_add_password_char(&self) -> bool {
        self.login_password.len() < MAX_PASSWORD_LENGTH
    }

    pub fn can_add_enroll_name_char(&self) -> bool {
        self.enroll_name_input.len() < MAX_ENROLL_NAME_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_wraps_both_ways() {
        let mut tab = Tab::Enrollments;
        for _ in 0..4 {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::Enrollments);

        assert_eq!(Tab::Enrollments.prev(), Tab::System);
        assert_eq!(Tab::System.next(), Tab::Enrollments);
    }

    #[test]
    fn test_user_message_simplifies_transport_errors() {
        assert_eq!(
            App::user_message("network error: tcp connect failed"),
            "Network error. Check your connection."
        );
        assert_eq!(
            App::user_message("operation timed out"),
            "Device not responding."
        );
        // Device-provided messages pass through
        assert_eq!(App::user_message("not found"), "not found");
    }
}
