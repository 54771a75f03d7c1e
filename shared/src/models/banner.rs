//! Storefront banner text

use super::LocalizedText;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /api/banner-text` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerText {
    pub text: LocalizedText,
    pub is_active: bool,
}

/// Loose acknowledgement body returned by the banner and category endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
}

impl AckResponse {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    /// Created-resource acknowledgement: explicit success or an echoed id/name
    pub fn is_created(&self) -> bool {
        self.is_success() || self.id.as_ref().is_some_and(|v| !v.is_null()) || self.name.is_some()
    }

    /// Server-provided reason, `message` first
    pub fn reason(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_detection() {
        let ack: AckResponse = serde_json::from_str(r#"{"id": 9, "name": "Seeds"}"#).unwrap();
        assert!(ack.is_created());
        assert!(!ack.is_success());

        let ack: AckResponse =
            serde_json::from_str(r#"{"success": false, "error": "duplicate"}"#).unwrap();
        assert!(!ack.is_created());
        assert_eq!(ack.reason(), Some("duplicate"));
    }

    #[test]
    fn test_banner_payload_shape() {
        let banner = BannerText {
            text: LocalizedText::new("Diwali sale"),
            is_active: true,
        };
        let json = serde_json::to_value(&banner).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["text"]["en"], "Diwali sale");
    }
}
