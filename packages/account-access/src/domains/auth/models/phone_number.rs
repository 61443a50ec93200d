use std::fmt;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Digit count of a canonical number in the app's international format
/// (country code + subscriber number, e.g. `380991234567`).
pub const DEFAULT_PHONE_DIGITS: usize = 12;

/// Canonical phone number: digits only, fixed length.
///
/// This is the single key used for the account lookup, the code request and the
/// account write. Construct it once per submission and pass the same value to all
/// three. Only [`PhoneNumber::parse`] constructs one.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneFormatError {
    #[error("unexpected character {0:?} in phone number")]
    UnexpectedCharacter(char),

    #[error("phone number has {found} digits, expected {expected}")]
    WrongLength { expected: usize, found: usize },
}

impl PhoneNumber {
    /// Canonicalize user input.
    ///
    /// Spaces, parentheses and hyphens are formatting and get stripped, as does a
    /// single leading `+`. Anything else that is not a digit is rejected.
    pub fn parse(raw: &str, digit_count: usize) -> Result<Self, PhoneFormatError> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let mut digits = String::with_capacity(digit_count);
        for c in body.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '(' | ')' | '-' => {}
                c if c.is_whitespace() => {}
                other => return Err(PhoneFormatError::UnexpectedCharacter(other)),
            }
        }

        // An empty key would address the whole collection.
        if digits.is_empty() || digits.len() != digit_count {
            return Err(PhoneFormatError::WrongLength {
                expected: digit_count,
                found: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// E.164 rendering expected by SMS providers.
    pub fn to_e164(&self) -> String {
        format!("+{}", self.0)
    }

    /// Short SHA256 prefix safe to put in logs.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        let hex = format!("{:x}", hasher.finalize());
        hex[..12].to_string()
    }
}

// Debug output ends up in logs; show the fingerprint, never the digits.
impl fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PhoneNumber({})", self.fingerprint())
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
