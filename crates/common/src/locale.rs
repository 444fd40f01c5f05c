//! Locale selection for user-facing text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Supported interface locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Ukrainian, the studio's primary audience
    #[default]
    Uk,
    En,
}

impl Locale {
    /// BCP 47 language tag
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Uk => "uk",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept region-qualified tags such as "uk-UA" or "en_US"
        let language = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "uk" | "ua" => Ok(Self::Uk),
            "en" => Ok(Self::En),
            _ => Err(Error::Configuration(format!("Unsupported locale: {}", s))),
        }
    }
}
