use serde::{Deserialize, Serialize};

/// The controller's settings table, as served by `GET /api/settings`.
///
/// Every field is optional and omitted-when-unset so the same struct works
/// for partial updates: `POST /api/settings` applies only the keys present
/// in the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    // WiFi
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_sta_ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wifi_sta_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_mode_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_ssid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap_password: Option<String>,

    // Web auth
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_auth_password: Option<String>,

    // MQTT
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mqtt_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mqtt_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mqtt_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mqtt_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mqtt_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mqtt_keepalive: Option<i64>,

    // Presence sensor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_trigger_time: Option<i64>,

    // Feedback hardware
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buzzer_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub led_enabled: Option<bool>,

    // On-device log capture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_capture_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_size_limit: Option<i64>,
}

impl DeviceSettings {
    /// Build a partial update that flips one boolean field. Returns `None`
    /// when `key` does not name a boolean or its current value is unknown.
    pub fn toggle_update(&self, key: &str) -> Option<DeviceSettings> {
        let mut update = DeviceSettings::default();
        match key {
            "ap_mode_enabled" => update.ap_mode_enabled = Some(!self.ap_mode_enabled?),
            "mqtt_enabled" => update.mqtt_enabled = Some(!self.mqtt_enabled?),
            "buzzer_enabled" => update.buzzer_enabled = Some(!self.buzzer_enabled?),
            "led_enabled" => update.led_enabled = Some(!self.led_enabled?),
            "log_capture_enabled" => {
                update.log_capture_enabled = Some(!self.log_capture_enabled?)
            }
            _ => return None,
        }
        Some(update)
    }

    /// Display rows for the settings tab, in the firmware's table order.
    /// Secrets are masked.
    pub fn display_rows(&self) -> Vec<(&'static str, String)> {
        fn opt_str(v: &Option<String>) -> String {
            v.clone().unwrap_or_default()
        }
        fn opt_bool(v: &Option<bool>) -> String {
            match v {
                Some(true) => "on".to_string(),
                Some(false) => "off".to_string(),
                None => String::new(),
            }
        }
        fn opt_int(v: &Option<i64>) -> String {
            v.map(|n| n.to_string()).unwrap_or_default()
        }
        fn masked(v: &Option<String>) -> String {
            match v {
                Some(s) if !s.is_empty() => "********".to_string(),
                _ => String::new(),
            }
        }

        vec![
            ("wifi_sta_ssid", opt_str(&self.wifi_sta_ssid)),
            ("wifi_sta_password", masked(&self.wifi_sta_password)),
            ("ap_mode_enabled", opt_bool(&self.ap_mode_enabled)),
            ("ap_ssid", opt_str(&self.ap_ssid)),
            ("ap_password", masked(&self.ap_password)),
            ("basic_auth_user", opt_str(&self.basic_auth_user)),
            ("basic_auth_password", masked(&self.basic_auth_password)),
            ("mqtt_enabled", opt_bool(&self.mqtt_enabled)),
            ("mqtt_uri", opt_str(&self.mqtt_uri)),
            ("mqtt_client_id", opt_str(&self.mqtt_client_id)),
            ("mqtt_username", opt_str(&self.mqtt_username)),
            ("mqtt_password", masked(&self.mqtt_password)),
            ("mqtt_keepalive", opt_int(&self.mqtt_keepalive)),
            ("distance_threshold", opt_int(&self.distance_threshold)),
            ("distance_trigger_time", opt_int(&self.distance_trigger_time)),
            ("buzzer_enabled", opt_bool(&self.buzzer_enabled)),
            ("led_enabled", opt_bool(&self.led_enabled)),
            ("log_capture_enabled", opt_bool(&self.log_capture_enabled)),
            ("log_size_limit", opt_int(&self.log_size_limit)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let json = r#"{
            "wifi_sta_ssid":"home-net",
            "wifi_sta_password":"hunter2",
            "ap_mode_enabled":false,
            "basic_auth_user":"admin",
            "mqtt_enabled":true,
            "mqtt_keepalive":60,
            "distance_threshold":400,
            "buzzer_enabled":true,
            "log_capture_enabled":true,
            "log_size_limit":200
        }"#;

        let settings: DeviceSettings = serde_json::from_str(json).expect("settings should parse");
        assert_eq!(settings.wifi_sta_ssid.as_deref(), Some("home-net"));
        assert_eq!(settings.ap_mode_enabled, Some(false));
        assert_eq!(settings.mqtt_keepalive, Some(60));
        // Keys the firmware didn't send stay None
        assert!(settings.ap_ssid.is_none());
        assert!(settings.led_enabled.is_none());
    }

    #[test]
    fn test_partial_update_serializes_only_set_keys() {
        let update = DeviceSettings {
            buzzer_enabled: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).expect("update should serialize");
        assert_eq!(json, r#"{"buzzer_enabled":false}"#);
    }

    #[test]
    fn test_toggle_update_flips_only_the_named_field() {
        let settings = DeviceSettings {
            buzzer_enabled: Some(true),
            led_enabled: Some(false),
            ..Default::default()
        };

        let update = settings
            .toggle_update("buzzer_enabled")
            .expect("boolean field should toggle");
        assert_eq!(update.buzzer_enabled, Some(false));
        assert_eq!(
            serde_json::to_string(&update).expect("update should serialize"),
            r#"{"buzzer_enabled":false}"#
        );

        // Unknown current value or non-boolean key produce no update
        assert!(settings.toggle_update("mqtt_enabled").is_none());
        assert!(settings.toggle_update("wifi_sta_ssid").is_none());
    }

    #[test]
    fn test_display_rows_mask_secrets() {
        let settings = DeviceSettings {
            wifi_sta_password: Some("hunter2".to_string()),
            basic_auth_user: Some("admin".to_string()),
            ..Default::default()
        };
        let rows = settings.display_rows();
        let wifi_pass = rows
            .iter()
            .find(|(k, _)| *k == "wifi_sta_password")
            .expect("row should exist");
        assert_eq!(wifi_pass.1, "********");
        let user = rows
            .iter()
            .find(|(k, _)| *k == "basic_auth_user")
            .expect("row should exist");
        assert_eq!(user.1, "admin");
    }
}
