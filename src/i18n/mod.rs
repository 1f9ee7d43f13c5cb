//! Localized message lookup.
//!
//! Templates use `{name}` placeholders. Lookups never fail: a key missing from
//! the active locale falls back to English, and a key missing everywhere is
//! returned as-is.

mod catalog;

use serde::{Deserialize, Serialize};
use std::fmt;

/// UI locales with a message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Es, Locale::Fr];

    /// Parse a locale code. Accepts region-qualified codes (`es-MX`, `fr_CA`).
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Look up `key` for `locale` and interpolate `params`.
pub fn get_message(key: &str, locale: Locale, params: &[(&str, &str)]) -> String {
    let template = catalog::lookup(locale, key)
        .or_else(|| catalog::lookup(Locale::En, key))
        .unwrap_or(key);
    interpolate(template, params)
}

fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in params {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// Human-readable name for a language code. Unknown codes are returned as given.
pub fn language_name(code: &str) -> String {
    let primary = code
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let name = match primary.as_str() {
        "ar" => "Arabic",
        "de" => "German",
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "hi" => "Hindi",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "nl" => "Dutch",
        "pl" => "Polish",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "sv" => "Swedish",
        "tr" => "Turkish",
        "uk" => "Ukrainian",
        "zh" => "Chinese",
        _ => return code.to_string(),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_named_params() {
        let msg = get_message("error_general", Locale::En, &[("error", "network down")]);
        assert!(msg.contains("network down"), "got: {msg}");
        assert!(!msg.contains("{error}"));
    }

    #[test]
    fn unknown_key_returns_key() {
        assert_eq!(get_message("no_such_key", Locale::Fr, &[]), "no_such_key");
    }

    #[test]
    fn every_english_key_exists_in_other_locales() {
        for key in catalog::KEYS {
            assert!(catalog::lookup(Locale::En, key).is_some(), "en missing {key}");
            assert!(catalog::lookup(Locale::Es, key).is_some(), "es missing {key}");
            assert!(catalog::lookup(Locale::Fr, key).is_some(), "fr missing {key}");
        }
    }

    #[test]
    fn locale_codes_accept_regions() {
        assert_eq!(Locale::from_code("es-MX"), Some(Locale::Es));
        assert_eq!(Locale::from_code("FR_ca"), Some(Locale::Fr));
        assert_eq!(Locale::from_code("de"), None);
    }

    #[test]
    fn language_names() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("pt-BR"), "Portuguese");
        assert_eq!(language_name("xx"), "xx");
    }
}
