use std::fmt;

use serde::{Deserialize, Serialize};

/// The two biometric record types the controller manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentKind {
    Fingerprint,
    Face,
}

impl EnrollmentKind {
    /// Path segment used in `/api/enrollments/{kind}` URLs; identical to
    /// the serde tag the firmware expects in request bodies.
    pub fn as_path(&self) -> &'static str {
        match self {
            EnrollmentKind::Fingerprint => "fingerprint",
            EnrollmentKind::Face => "face",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EnrollmentKind::Fingerprint => "Fingerprint",
            EnrollmentKind::Face => "Face",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            EnrollmentKind::Fingerprint => EnrollmentKind::Face,
            EnrollmentKind::Face => EnrollmentKind::Fingerprint,
        }
    }
}

impl fmt::Display for EnrollmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// A stored biometric record on the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: u32,
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub usage_count: u32,
}

/// Wire wrapper for `GET /api/enrollments/{kind}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentList {
    #[serde(default)]
    pub items: Vec<Enrollment>,
}

/// Body for `POST /api/enrollment`; the firmware echoes it back on accept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRequest {
    #[serde(rename = "type")]
    pub kind: EnrollmentKind,
    pub user_name: String,
}

/// Fingerprint enrollment progress: two numbered scan passes.
#[derive(Debug, Clone, Deserialize)]
pub struct FingerprintProgress {
    pub current_step: String,
    #[serde(default)]
    pub passed_steps: u8,
    #[serde(default)]
    pub remaining_steps: u8,
}

/// Face enrollment progress: named head-direction steps.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceProgress {
    pub current_step: String,
    #[serde(default)]
    pub passed_steps: Vec<String>,
    #[serde(default)]
    pub remaining_steps: Vec<String>,
}

/// Response of `GET /api/enrollment`. `kind` is null when nothing is
/// being enrolled; exactly one progress field is present otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentStatus {
    #[serde(rename = "type")]
    pub kind: Option<EnrollmentKind>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(rename = "fingerprint_enroll_status")]
    pub fingerprint: Option<FingerprintProgress>,
    #[serde(rename = "face_enroll_status")]
    pub face: Option<FaceProgress>,
}

impl EnrollmentStatus {
    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    /// One-line progress summary for the UI.
    pub fn progress_display(&self) -> String {
        match (&self.fingerprint, &self.face) {
            (Some(fp), _) => format!(
                "{} ({}/{} scans)",
                fp.current_step,
                fp.passed_steps,
                fp.passed_steps + fp.remaining_steps
            ),
            (None, Some(face)) => format!(
                "{} ({}/{} directions)",
                face.current_step,
                face.passed_steps.len(),
                face.passed_steps.len() + face.remaining_steps.len()
            ),
            (None, None) => "idle".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_enrollment_list() {
        let json = r#"{"items":[
            {"id":1,"name":"alice","enabled":true,"usage_count":12},
            {"id":3,"name":"bob","enabled":false,"usage_count":0}
        ]}"#;

        let list: EnrollmentList = serde_json::from_str(json).expect("list should parse");
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].name, "alice");
        assert!(list.items[0].enabled);
        assert_eq!(list.items[1].usage_count, 0);
    }

    #[test]
    fn test_parse_idle_status() {
        let status: EnrollmentStatus =
            serde_json::from_str(r#"{"type":null}"#).expect("idle status should parse");
        assert!(!status.is_active());
        assert_eq!(status.progress_display(), "idle");
    }

    #[test]
    fn test_parse_fingerprint_status() {
        let json = r#"{
            "type":"fingerprint",
            "user_name":"alice",
            "fingerprint_enroll_status":{"current_step":"scan_2","passed_steps":1,"remaining_steps":1}
        }"#;

        let status: EnrollmentStatus = serde_json::from_str(json).expect("status should parse");
        assert_eq!(status.kind, Some(EnrollmentKind::Fingerprint));
        assert_eq!(status.progress_display(), "scan_2 (1/2 scans)");
    }

    #[test]
    fn test_parse_face_status() {
        let json = r#"{
            "type":"face",
            "user_name":"bob",
            "face_enroll_status":{
                "current_step":"direction_up",
                "passed_steps":["direction_middle"],
                "remaining_steps":["direction_up","direction_down","direction_left","direction_right"]
            }
        }"#;

        let status: EnrollmentStatus = serde_json::from_str(json).expect("status should parse");
        assert_eq!(status.kind, Some(EnrollmentKind::Face));
        assert_eq!(status.progress_display(), "direction_up (1/5 directions)");
    }

    #[test]
    fn test_kind_serializes_as_lowercase_tag() {
        let req = EnrollmentRequest {
            kind: EnrollmentKind::Face,
            user_name: "carol".to_string(),
        };
        let json = serde_json::to_string(&req).expect("request should serialize");
        assert_eq!(json, r#"{"type":"face","user_name":"carol"}"#);
    }
}
