use thiserror::Error;

use super::models::{PhoneFormatError, ProfileField};
use crate::kernel::{IdentityError, StoreError};

/// Everything the session flow can report back to the screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("invalid phone number: {0}")]
    InvalidPhoneFormat(PhoneFormatError),

    #[error("no account is registered for this phone number")]
    AccountNotFound,

    #[error("an account is already registered for this phone number")]
    AccountAlreadyExists,

    #[error("required field is empty: {0}")]
    MissingProfileField(ProfileField),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("verification code rejected")]
    InvalidCode,

    /// Confirmation attempted with no outstanding challenge. Caller misuse.
    #[error("no active verification challenge")]
    NoActiveChallenge,

    /// Second submission while the previous one is still awaiting a service.
    #[error("a submission is already in flight")]
    StepInFlight,
}

/// Fieldless mirror of [`FlowError`] for rendering and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowErrorKind {
    InvalidPhoneFormat,
    AccountNotFound,
    AccountAlreadyExists,
    MissingProfileField,
    ServiceUnavailable,
    InvalidCode,
    NoActiveChallenge,
    StepInFlight,
}

impl FlowError {
    pub fn kind(&self) -> FlowErrorKind {
        match self {
            FlowError::InvalidPhoneFormat(_) => FlowErrorKind::InvalidPhoneFormat,
            FlowError::AccountNotFound => FlowErrorKind::AccountNotFound,
            FlowError::AccountAlreadyExists => FlowErrorKind::AccountAlreadyExists,
            FlowError::MissingProfileField(_) => FlowErrorKind::MissingProfileField,
            FlowError::ServiceUnavailable(_) => FlowErrorKind::ServiceUnavailable,
            FlowError::InvalidCode => FlowErrorKind::InvalidCode,
            FlowError::NoActiveChallenge => FlowErrorKind::NoActiveChallenge,
            FlowError::StepInFlight => FlowErrorKind::StepInFlight,
        }
    }
}

impl FlowErrorKind {
    /// Whether the user can fix this by retrying the current step.
    /// The others point at a caller bug and are never shown on screen.
    pub fn is_user_recoverable(self) -> bool {
        !matches!(
            self,
            FlowErrorKind::NoActiveChallenge | FlowErrorKind::StepInFlight
        )
    }
}

impl From<PhoneFormatError> for FlowError {
    fn from(e: PhoneFormatError) -> Self {
        FlowError::InvalidPhoneFormat(e)
    }
}

impl From<StoreError> for FlowError {
    fn from(e: StoreError) -> Self {
        FlowError::ServiceUnavailable(e.to_string())
    }
}

impl From<IdentityError> for FlowError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::InvalidCode => FlowError::InvalidCode,
            IdentityError::Unavailable(_) => FlowError::ServiceUnavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_errors_map_to_taxonomy() {
        assert_eq!(
            FlowError::from(IdentityError::InvalidCode),
            FlowError::InvalidCode
        );
        assert_eq!(
            FlowError::from(IdentityError::Unavailable(anyhow::anyhow!("timeout"))).kind(),
            FlowErrorKind::ServiceUnavailable
        );
    }

    #[test]
    fn test_store_errors_are_service_unavailable() {
        let err = FlowError::from(StoreError::Unavailable(anyhow::anyhow!("503")));
        assert_eq!(err.kind(), FlowErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_misuse_errors_are_not_user_recoverable() {
        assert!(!FlowErrorKind::NoActiveChallenge.is_user_recoverable());
        assert!(!FlowErrorKind::StepInFlight.is_user_recoverable());
        assert!(FlowErrorKind::InvalidCode.is_user_recoverable());
        assert!(FlowErrorKind::ServiceUnavailable.is_user_recoverable());
    }
}
