use super::models::{AccountRecord, ChallengeHandle, PhoneNumber, VerificationCode};

/// Auth commands - remote calls the session machine asks for
///
/// Each command is one suspend point: the effect performs exactly one service
/// call and answers with exactly one event.
#[derive(Debug, Clone)]
pub enum AuthCommand {
    CheckAccount { phone: PhoneNumber },
    RequestCode { phone: PhoneNumber },
    ConfirmCode {
        handle: ChallengeHandle,
        code: VerificationCode,
    },
    CreateAccount { record: AccountRecord },
}

impl AuthCommand {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            AuthCommand::CheckAccount { .. } => "check_account",
            AuthCommand::RequestCode { .. } => "request_code",
            AuthCommand::ConfirmCode { .. } => "confirm_code",
            AuthCommand::CreateAccount { .. } => "create_account",
        }
    }
}
