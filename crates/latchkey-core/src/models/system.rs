use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic acknowledgement the firmware returns for mutations
/// (reboot, cancel enrollment, delete records, settings update).
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: String,
}

/// One entry of the device's captured log, from `GET /api/log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub index: u64,
    /// Unix timestamp (seconds). The device clock may predate NTP sync,
    /// in which case this counts from boot.
    pub timestamp: i64,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub message: String,
}

impl LogEntry {
    /// Render the timestamp as local wall-clock time, or seconds-from-boot
    /// when the device clock was clearly never synced.
    pub fn timestamp_display(&self) -> String {
        // Anything before 2001 is a never-synced clock counting from boot
        const PLAUSIBLE_EPOCH: i64 = 978_307_200;

        if self.timestamp < PLAUSIBLE_EPOCH {
            return format!("+{}s", self.timestamp);
        }
        match DateTime::<Utc>::from_timestamp(self.timestamp, 0) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format!("+{}s", self.timestamp),
        }
    }
}

/// Response of `GET /api/system/firmware`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirmwareInfo {
    #[serde(default)]
    pub fw_version: String,
    #[serde(default)]
    pub idf_version: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub build_time: String,
    #[serde(default)]
    pub git_hash: String,
}

impl FirmwareInfo {
    pub fn build_display(&self) -> String {
        format!("{} {}", self.build_date, self.build_time)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ack() {
        let ack: Ack = serde_json::from_str(r#"{"ok":true,"message":"Rebooting"}"#)
            .expect("ack should parse");
        assert!(ack.ok);
        assert_eq!(ack.message, "Rebooting");
    }

    #[test]
    fn test_parse_log_entries() {
        let json = r#"[
            {"index":41,"timestamp":1754000000,"level":"I","tag":"ACCESS","message":"door opened"},
            {"index":42,"timestamp":17,"level":"W","tag":"WIFI","message":"sta disconnected"}
        ]"#;

        let entries: Vec<LogEntry> = serde_json::from_str(json).expect("log should parse");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tag, "ACCESS");
        // Synced clock formats as a date, unsynced as boot-relative seconds
        assert!(entries[0].timestamp_display().starts_with("2025-"));
        assert_eq!(entries[1].timestamp_display(), "+17s");
    }

    #[test]
    fn test_parse_firmware_info() {
        let json = r#"{
            "fw_version":"1.4.2",
            "idf_version":"v5.2.1",
            "build_date":"Jun 12 2025",
            "build_time":"10:31:05",
            "git_hash":"9f3c1ab"
        }"#;

        let info: FirmwareInfo = serde_json::from_str(json).expect("firmware info should parse");
        assert_eq!(info.fw_version, "1.4.2");
        assert_eq!(info.build_display(), "Jun 12 2025 10:31:05");
    }
}
