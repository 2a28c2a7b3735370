//! Languages the site is published in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
    He,
}

impl Language {
    /// Every supported language, in menu order.
    pub const ALL: [Language; 3] = [Language::Fr, Language::En, Language::He];

    /// BCP 47 code used in `lang` and `hreflang` attributes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
            Self::He => "he",
        }
    }

    /// Text direction for the `dir` attribute.
    pub fn dir(&self) -> &'static str {
        match self {
            Self::Fr | Self::En => "ltr",
            Self::He => "rtl",
        }
    }

    /// Open Graph locale.
    pub fn og_locale(&self) -> &'static str {
        match self {
            Self::Fr => "fr_FR",
            Self::En => "en_US",
            Self::He => "he_IL",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for a language code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported language: {0} (expected fr, en or he)")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Self::Fr),
            "en" => Ok(Self::En),
            "he" => Ok(Self::He),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}
