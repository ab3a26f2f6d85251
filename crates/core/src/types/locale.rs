//! Country and language codes used for `@inContext` localization.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a locale code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The code is not two ASCII letters.
    #[error("invalid {kind} code: {value:?} (expected two ASCII letters)")]
    InvalidCode {
        /// Which kind of code was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

fn parse_alpha2(kind: &'static str, s: &str) -> Result<String, LocaleError> {
    let s = s.trim();
    if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(s.to_ascii_uppercase())
    } else {
        Err(LocaleError::InvalidCode {
            kind,
            value: s.to_owned(),
        })
    }
}

/// ISO 3166-1 alpha-2 country code, as Shopify's `CountryCode` enum spells it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse a country code; lowercase input is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, LocaleError> {
        parse_alpha2("country", s).map(Self)
    }

    /// Returns the upper-case code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CountryCode {
    fn default() -> Self {
        Self("US".to_owned())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.0
    }
}

/// Writing direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

/// ISO 639-1 language code, as Shopify's `LanguageCode` enum spells it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

/// Languages written right to left.
const RTL_LANGUAGES: &[&str] = &["AR", "FA", "HE", "UR", "PS", "YI"];

impl Language {
    /// Parse a language code; lowercase input is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not two ASCII letters.
    pub fn parse(s: &str) -> Result<Self, LocaleError> {
        parse_alpha2("language", s).map(Self)
    }

    /// English.
    #[must_use]
    pub fn english() -> Self {
        Self("EN".to_owned())
    }

    /// Returns the upper-case code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Writing direction for this language.
    #[must_use]
    pub fn direction(&self) -> TextDirection {
        if RTL_LANGUAGES.contains(&self.0.as_str()) {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Language {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}
