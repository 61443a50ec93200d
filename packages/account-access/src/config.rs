use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::common::Locale;
use crate::domains::auth::models::DEFAULT_PHONE_DIGITS;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_verify_service_sid: String,
    pub firestore_project_id: String,
    /// OAuth bearer token for Firestore REST. Unset when talking to the emulator.
    pub firestore_token: Option<String>,
    /// Override for the Firestore REST host (emulator).
    pub firestore_base_url: Option<String>,
    pub phone_digit_count: usize,
    pub locale: Locale,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID")
                .context("TWILIO_ACCOUNT_SID must be set")?,
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN")
                .context("TWILIO_AUTH_TOKEN must be set")?,
            twilio_verify_service_sid: env::var("TWILIO_VERIFY_SERVICE_SID")
                .context("TWILIO_VERIFY_SERVICE_SID must be set")?,
            firestore_project_id: env::var("FIRESTORE_PROJECT_ID")
                .context("FIRESTORE_PROJECT_ID must be set")?,
            firestore_token: env::var("FIRESTORE_TOKEN").ok(),
            firestore_base_url: env::var("FIRESTORE_BASE_URL").ok(),
            phone_digit_count: parse_phone_digit_count(env::var("PHONE_DIGIT_COUNT").ok())?,
            locale: env::var("APP_LOCALE")
                .unwrap_or_else(|_| "uk".to_string())
                .parse()
                .context("APP_LOCALE must be one of: uk, en")?,
        })
    }
}

/// `PHONE_DIGIT_COUNT`, defaulting to the app's international format.
fn parse_phone_digit_count(raw: Option<String>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_PHONE_DIGITS);
    };
    let count: usize = raw
        .trim()
        .parse()
        .context("PHONE_DIGIT_COUNT must be a valid number")?;
    if count == 0 {
        bail!("PHONE_DIGIT_COUNT must be greater than zero");
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_digit_count_defaults() {
        assert_eq!(parse_phone_digit_count(None).unwrap(), DEFAULT_PHONE_DIGITS);
    }

    #[test]
    fn test_phone_digit_count_override() {
        assert_eq!(parse_phone_digit_count(Some("10".to_string())).unwrap(), 10);
    }

    #[test]
    fn test_phone_digit_count_rejects_zero() {
        let err = parse_phone_digit_count(Some("0".to_string())).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn test_phone_digit_count_rejects_garbage() {
        assert!(parse_phone_digit_count(Some("twelve".to_string())).is_err());
        assert!(parse_phone_digit_count(Some("-1".to_string())).is_err());
    }
}
