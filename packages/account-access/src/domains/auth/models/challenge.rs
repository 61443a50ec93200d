use std::fmt;

use super::PhoneNumber;

/// Number of digits in an SMS verification code.
pub const CODE_LENGTH: usize = 6;

/// Opaque token the identity service returns for an outstanding challenge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChallengeHandle(String);

impl ChallengeHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChallengeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A six digit code typed by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Returns `None` unless the trimmed input is exactly [`CODE_LENGTH`] ASCII digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();
        if code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(code.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Codes are secrets; keep them out of Debug output and logs.
impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(******)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// Code sent, waiting for the user to type it.
    Pending,
    /// A confirmation call is outstanding.
    Confirming,
}

/// An in-flight OTP challenge. Absence of a session is the `none` status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationSession {
    pub phone: PhoneNumber,
    pub handle: ChallengeHandle,
    pub status: ChallengeStatus,
}

impl VerificationSession {
    pub fn new(phone: PhoneNumber, handle: ChallengeHandle) -> Self {
        Self {
            phone,
            handle,
            status: ChallengeStatus::Pending,
        }
    }
}
