//! Localized text (en / hi / te)

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Languages the storefront is published in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    Te,
}

impl Language {
    /// Primary language; the other languages are derived from it
    pub const PRIMARY: Language = Language::En;

    /// Languages filled by translation from the primary
    pub const SECONDARY: [Language; 2] = [Language::Hi, Language::Te];

    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Te];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Te => "te",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Text in every storefront language. `en` is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub en: String,
    pub hi: String,
    pub te: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.en,
            Language::Hi => &self.hi,
            Language::Te => &self.te,
        }
    }

    pub fn set(&mut self, lang: Language, value: impl Into<String>) {
        let slot = match lang {
            Language::En => &mut self.en,
            Language::Hi => &mut self.hi,
            Language::Te => &mut self.te,
        };
        *slot = value.into();
    }

    /// True when the authoritative (`en`) value is blank
    pub fn is_blank(&self) -> bool {
        self.en.trim().is_empty()
    }

    /// Copy with every language trimmed
    pub fn trimmed(&self) -> Self {
        Self {
            en: self.en.trim().to_string(),
            hi: self.hi.trim().to_string(),
            te: self.te.trim().to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocalizedRepr {
    Plain(String),
    Map {
        #[serde(default)]
        en: Option<String>,
        #[serde(default)]
        hi: Option<String>,
        #[serde(default)]
        te: Option<String>,
    },
}

impl<'de> Deserialize<'de> for LocalizedText {
    /// Accepts `{"en": .., "hi": .., "te": ..}` with missing or null entries,
    /// or a bare string which becomes the `en` value.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match LocalizedRepr::deserialize(deserializer)? {
            LocalizedRepr::Plain(en) => LocalizedText::new(en),
            LocalizedRepr::Map { en, hi, te } => LocalizedText {
                en: en.unwrap_or_default(),
                hi: hi.unwrap_or_default(),
                te: te.unwrap_or_default(),
            },
        })
    }
}
