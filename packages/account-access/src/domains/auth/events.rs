use super::errors::FlowError;
use super::models::{ChallengeHandle, PhoneNumber, VerificationCode};

/// Auth events - facts fed into the session machine
///
/// Intent events come from the screen (`PhoneSubmitted`, `CodeSubmitted`, `Left`);
/// the rest are outcomes of commands executed by the effect.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// A phone number passed local validation and was submitted
    PhoneSubmitted { phone: PhoneNumber },

    /// The account lookup answered
    AccountChecked { exists: bool },

    /// The identity service issued a challenge
    CodeSent { handle: ChallengeHandle },

    /// A well-formed code was submitted
    CodeSubmitted { code: VerificationCode },

    /// The identity service approved the code
    CodeConfirmed,

    /// The identity service rejected the code (wrong, expired, or superseded)
    CodeRejected,

    /// The account record was written
    AccountCreated,

    /// A remote call failed; carries the mapped flow error
    ServiceFailed { error: FlowError },

    /// The screen was left; drop any outstanding challenge
    Left,
}
