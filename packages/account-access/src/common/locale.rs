use std::str::FromStr;

use thiserror::Error;

/// Language used for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Uk,
    En,
}

#[derive(Debug, Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uk" | "uk-ua" | "uk_ua" => Ok(Locale::Uk),
            "en" | "en-us" | "en_us" | "en-gb" => Ok(Locale::En),
            other => Err(UnsupportedLocale(other.to_string())),
        }
    }
}
