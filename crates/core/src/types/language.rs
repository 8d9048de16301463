//! Supported interface and response languages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A language the assistant answers in.
///
/// Marathi is the default: the app was built for farmers in Maharashtra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    #[default]
    Mr,
}

impl Language {
    /// Every supported language, in table column order.
    pub const ALL: [Self; 3] = [Self::En, Self::Hi, Self::Mr];

    /// Two-letter language code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
            Self::Mr => "mr",
        }
    }

    /// English name of the language, used inside model prompts.
    #[must_use]
    pub const fn prompt_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "Hindi",
            Self::Mr => "Marathi",
        }
    }

    /// Parse a language code such as `mr` or `hi-IN`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "hi" => Some(Self::Hi),
            "mr" => Some(Self::Mr),
            _ => None,
        }
    }

    /// Pick the first supported language from an `Accept-Language` header.
    ///
    /// Quality weights are ignored; entries are taken in header order.
    #[must_use]
    pub fn from_accept_language(header: &str) -> Option<Self> {
        header
            .split(',')
            .filter_map(|entry| entry.split(';').next())
            .find_map(Self::from_code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("unsupported language: {s}"))
    }
}
