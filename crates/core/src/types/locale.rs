//! Storefront locales.
//!
//! The storefront is published in a closed set of languages. Because locale
//! codes end up inside CMS projections (`title.fr`), only values of this enum
//! are ever interpolated into a query.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Locale`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0}")]
pub struct LocaleError(pub String);

/// A storefront locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Zh,
    No,
    Sv,
    Ja,
    Es,
}

impl Locale {
    /// Every supported locale, default first.
    pub const ALL: [Self; 7] = [
        Self::En,
        Self::Fr,
        Self::Zh,
        Self::No,
        Self::Sv,
        Self::Ja,
        Self::Es,
    ];

    /// Two-letter code used as the CMS field key.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Zh => "zh",
            Self::No => "no",
            Self::Sv => "sv",
            Self::Ja => "ja",
            Self::Es => "es",
        }
    }

    /// Name of the language in that language.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Fr => "Français",
            Self::Zh => "中文",
            Self::No => "Norsk",
            Self::Sv => "Svenska",
            Self::Ja => "日本語",
            Self::Es => "Español",
        }
    }

    /// Whether this is the default locale.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::En)
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    /// Parse a locale code, accepting region-qualified tags like `fr-FR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|locale| locale.code() == primary)
            .ok_or_else(|| LocaleError(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_region_codes() {
        assert_eq!("fr".parse::<Locale>().unwrap(), Locale::Fr);
        assert_eq!("fr-FR".parse::<Locale>().unwrap(), Locale::Fr);
        assert_eq!("ZH_cn".parse::<Locale>().unwrap(), Locale::Zh);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "de".parse::<Locale>(),
            Err(LocaleError("de".to_string()))
        );
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Locale::default(), Locale::En);
        assert!(Locale::En.is_default());
        assert!(!Locale::Ja.is_default());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::Sv).unwrap(), "\"sv\"");
        let parsed: Locale = serde_json::from_str("\"ja\"").unwrap();
        assert_eq!(parsed, Locale::Ja);
    }
}
