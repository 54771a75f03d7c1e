//! Third-party translation lookup
//!
//! `GET {endpoint}?q=<text>&langpair=en|<lang>` answering
//! `{responseStatus, responseData: {translatedText}}`. Only a
//! `responseStatus` of 200 counts as a translation.

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use shared::models::Language;
use std::time::Duration;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate English `text` into `target`
    async fn translate(&self, text: &str, target: Language) -> ClientResult<String>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    response_status: Value,
    #[serde(default)]
    response_data: Option<LookupData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupData {
    #[serde(default)]
    translated_text: Option<String>,
}

impl LookupResponse {
    fn status_ok(&self) -> bool {
        match &self.response_status {
            Value::Number(n) => n.as_u64() == Some(200),
            Value::String(s) => s == "200",
            _ => false,
        }
    }

    fn into_text(self) -> ClientResult<String> {
        if !self.status_ok() {
            return Err(ClientError::InvalidResponse(format!(
                "translator status {}",
                self.response_status
            )));
        }
        self.response_data
            .and_then(|data| data.translated_text)
            .ok_or_else(|| ClientError::InvalidResponse("missing translatedText".into()))
    }
}

/// MyMemory-compatible translator
#[derive(Debug, Clone)]
pub struct MyMemoryTranslator {
    client: Client,
    endpoint: String,
}

impl MyMemoryTranslator {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.translate_url.clone(),
        })
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str, target: Language) -> ClientResult<String> {
        let langpair = format!("{}|{}", Language::PRIMARY.code(), target.code());
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: "Translation request failed".into(),
            });
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        lookup.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ClientResult<String> {
        serde_json::from_str::<LookupResponse>(body).unwrap().into_text()
    }

    #[test]
    fn test_successful_lookup() {
        let text = parse(r#"{"responseStatus": 200, "responseData": {"translatedText": "काजू"}}"#);
        assert_eq!(text.unwrap(), "काजू");
    }

    #[test]
    fn test_quota_status_is_failure() {
        let result = parse(
            r#"{"responseStatus": "403", "responseData": {"translatedText": "MYMEMORY WARNING"}}"#,
        );
        assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
    }

    #[test]
    fn test_missing_data_is_failure() {
        assert!(parse(r#"{"responseStatus": 200}"#).is_err());
    }
}
