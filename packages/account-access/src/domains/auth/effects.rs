use tracing::{debug, error, info, warn};

use super::commands::AuthCommand;
use super::errors::FlowError;
use super::events::AuthEvent;
use super::gate::AccountGate;
use crate::kernel::{AuthDeps, IdentityError};

/// Auth effect - runs the remote call behind each command
///
/// Every failure is turned into an event here; nothing service-shaped leaves
/// this boundary as an error.
pub struct AuthEffect {
    deps: AuthDeps,
    gate: AccountGate,
}

impl AuthEffect {
    pub fn new(deps: AuthDeps) -> Self {
        let gate = AccountGate::new(deps.document_store.clone());
        Self { deps, gate }
    }

    pub async fn execute(&self, cmd: AuthCommand) -> AuthEvent {
        debug!(command = cmd.name(), "executing auth command");

        match cmd {
            AuthCommand::CheckAccount { phone } => match self.gate.check_exists(&phone).await {
                Ok(exists) => AuthEvent::AccountChecked { exists },
                Err(error) => AuthEvent::ServiceFailed { error },
            },

            AuthCommand::RequestCode { phone } => {
                match self.deps.identity.request_code(&phone).await {
                    Ok(handle) => {
                        info!(phone = %phone.fingerprint(), "verification code sent");
                        AuthEvent::CodeSent { handle }
                    }
                    Err(e) => {
                        error!(phone = %phone.fingerprint(), error = %e, "failed to send verification code");
                        AuthEvent::ServiceFailed {
                            error: FlowError::from(e),
                        }
                    }
                }
            }

            AuthCommand::ConfirmCode { handle, code } => {
                match self.deps.identity.confirm(&handle, &code).await {
                    Ok(()) => {
                        info!("verification code confirmed");
                        AuthEvent::CodeConfirmed
                    }
                    Err(IdentityError::InvalidCode) => {
                        warn!("verification code rejected");
                        AuthEvent::CodeRejected
                    }
                    Err(e) => {
                        error!(error = %e, "verification check failed");
                        AuthEvent::ServiceFailed {
                            error: FlowError::from(e),
                        }
                    }
                }
            }

            AuthCommand::CreateAccount { record } => {
                match record.insert(self.deps.document_store.as_ref()).await {
                    Ok(()) => {
                        info!("account record created");
                        AuthEvent::AccountCreated
                    }
                    Err(e) => {
                        // The code is already spent at this point; the user has to start over.
                        error!(error = %e, "failed to create account record after confirmation");
                        AuthEvent::ServiceFailed {
                            error: FlowError::from(e),
                        }
                    }
                }
            }
        }
    }
}
