pub mod account;
pub mod challenge;
pub mod phone_number;

pub use account::{AccountRecord, ProfileField, ProfileFields, USERS_COLLECTION};
pub use challenge::{
    ChallengeHandle, ChallengeStatus, VerificationCode, VerificationSession, CODE_LENGTH,
};
pub use phone_number::{PhoneFormatError, PhoneNumber, DEFAULT_PHONE_DIGITS};

/// Which screen the flow is running for.
///
/// Login and registration share the whole state machine; they differ only in
/// which gate answer lets the code request through and in whether an account
/// record is written after confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowMode {
    Login,
    Registration,
}

impl FlowMode {
    /// Whether an account existing (or not) allows a code to be issued.
    pub fn admits(self, account_exists: bool) -> bool {
        match self {
            FlowMode::Login => account_exists,
            FlowMode::Registration => !account_exists,
        }
    }

    pub fn writes_account(self) -> bool {
        matches!(self, FlowMode::Registration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_existing_account() {
        assert!(FlowMode::Login.admits(true));
        assert!(!FlowMode::Login.admits(false));
    }

    #[test]
    fn test_registration_requires_missing_account() {
        assert!(FlowMode::Registration.admits(false));
        assert!(!FlowMode::Registration.admits(true));
    }
}
