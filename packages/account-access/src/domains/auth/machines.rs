//! Session machine - the OTP flow as a pure state machine.
//!
//! The machine never performs IO. It takes an event, updates its state and
//! optionally returns the one command the flow has to run next. The flow
//! controller executes that command and feeds the outcome back as the next
//! event, so every remote call is a single, ordered suspend point:
//!
//! ```text
//! PhoneSubmitted → CheckAccount → AccountChecked → RequestCode → CodeSent
//! CodeSubmitted  → ConfirmCode  → CodeConfirmed  → CreateAccount (registration) → AccountCreated
//! ```

use tracing::{debug, warn};

use super::commands::AuthCommand;
use super::errors::FlowError;
use super::events::AuthEvent;
use super::models::{
    AccountRecord, ChallengeStatus, FlowMode, PhoneNumber, ProfileFields, VerificationSession,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    /// Waiting for a phone number. Initial state, and where failed
    /// phone-step calls come back to.
    AwaitingPhone,
    /// Account lookup outstanding.
    CheckingAccount,
    /// Lookup admitted the number; code request outstanding.
    RequestingCode,
    /// Code sent; waiting for the user to type it.
    AwaitingCode,
    /// Confirmation outstanding.
    Confirming,
    /// Code confirmed; account write outstanding (registration only).
    CreatingAccount,
    /// Terminal.
    Authenticated,
}

impl FlowState {
    /// States in which a remote call is outstanding.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            FlowState::CheckingAccount
                | FlowState::RequestingCode
                | FlowState::Confirming
                | FlowState::CreatingAccount
        )
    }
}

/// Session machine - one per screen visit
pub struct SessionMachine {
    mode: FlowMode,
    state: FlowState,
    /// Canonical phone of the current submission. The lookup, the code request
    /// and the account write all read it from here.
    phone: Option<PhoneNumber>,
    session: Option<VerificationSession>,
    profile: ProfileFields,
    error: Option<FlowError>,
}

impl SessionMachine {
    pub fn new(mode: FlowMode) -> Self {
        Self {
            mode,
            state: FlowState::AwaitingPhone,
            phone: None,
            session: None,
            profile: ProfileFields::default(),
            error: None,
        }
    }

    pub fn mode(&self) -> FlowMode {
        self.mode
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn session(&self) -> Option<&VerificationSession> {
        self.session.as_ref()
    }

    pub fn error(&self) -> Option<&FlowError> {
        self.error.as_ref()
    }

    pub fn profile(&self) -> &ProfileFields {
        &self.profile
    }

    pub fn set_name(&mut self, name: String) {
        self.profile.name = name;
    }

    pub fn set_email(&mut self, email: String) {
        self.profile.email = email;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Record an error found before any event was produced (local validation).
    pub fn fail(&mut self, error: FlowError) {
        self.error = Some(error);
    }

    /// Interpret an event and decide the next command, if any.
    pub fn decide(&mut self, event: &AuthEvent) -> Option<AuthCommand> {
        match (self.state, event) {
            // Resubmitting from AwaitingCode is the resend path: same checks,
            // and the old challenge is dropped before anything else happens.
            (
                FlowState::AwaitingPhone | FlowState::AwaitingCode,
                AuthEvent::PhoneSubmitted { phone },
            ) => {
                self.error = None;
                if self.mode.writes_account() {
                    if let Some(field) = self.profile.first_missing() {
                        self.error = Some(FlowError::MissingProfileField(field));
                        return None;
                    }
                }

                self.session = None;
                self.phone = Some(phone.clone());
                self.state = FlowState::CheckingAccount;
                Some(AuthCommand::CheckAccount {
                    phone: phone.clone(),
                })
            }

            (FlowState::CheckingAccount, AuthEvent::AccountChecked { exists }) => {
                if !self.mode.admits(*exists) {
                    self.error = Some(match self.mode {
                        FlowMode::Login => FlowError::AccountNotFound,
                        FlowMode::Registration => FlowError::AccountAlreadyExists,
                    });
                    self.state = FlowState::AwaitingPhone;
                    return None;
                }

                let phone = self.current_phone()?;
                self.state = FlowState::RequestingCode;
                Some(AuthCommand::RequestCode { phone })
            }

            (FlowState::RequestingCode, AuthEvent::CodeSent { handle }) => {
                let phone = self.current_phone()?;
                self.session = Some(VerificationSession::new(phone, handle.clone()));
                self.state = FlowState::AwaitingCode;
                None
            }

            (_, AuthEvent::CodeSubmitted { code }) => {
                self.error = None;
                let Some(session) = self.session.as_mut() else {
                    self.error = Some(FlowError::NoActiveChallenge);
                    return None;
                };
                if self.state != FlowState::AwaitingCode {
                    debug!(state = ?self.state, "code submitted outside AwaitingCode, ignoring");
                    return None;
                }

                session.status = ChallengeStatus::Confirming;
                self.state = FlowState::Confirming;
                Some(AuthCommand::ConfirmCode {
                    handle: session.handle.clone(),
                    code: code.clone(),
                })
            }

            (FlowState::Confirming, AuthEvent::CodeConfirmed) => {
                // The challenge is spent either way.
                self.session = None;
                if !self.mode.writes_account() {
                    self.state = FlowState::Authenticated;
                    return None;
                }

                let phone = self.current_phone()?;
                self.state = FlowState::CreatingAccount;
                Some(AuthCommand::CreateAccount {
                    record: AccountRecord::new(&phone, &self.profile),
                })
            }

            (FlowState::Confirming, AuthEvent::CodeRejected) => {
                if let Some(session) = self.session.as_mut() {
                    session.status = ChallengeStatus::Pending;
                }
                self.error = Some(FlowError::InvalidCode);
                self.state = FlowState::AwaitingCode;
                None
            }

            (FlowState::CreatingAccount, AuthEvent::AccountCreated) => {
                self.state = FlowState::Authenticated;
                None
            }

            // Outcomes arriving after the screen was left find the machine idle
            // and fall through to the ignore arm.
            (state, AuthEvent::ServiceFailed { error }) if state.is_busy() => {
                self.error = Some(error.clone());
                match state {
                    FlowState::Confirming => {
                        if let Some(session) = self.session.as_mut() {
                            session.status = ChallengeStatus::Pending;
                        }
                        self.state = FlowState::AwaitingCode;
                    }
                    _ => {
                        self.session = None;
                        self.state = FlowState::AwaitingPhone;
                    }
                }
                None
            }

            (_, AuthEvent::Left) => {
                self.state = FlowState::AwaitingPhone;
                self.phone = None;
                self.session = None;
                self.error = None;
                None
            }

            (state, event) => {
                debug!(?state, ?event, "event ignored in current state");
                None
            }
        }
    }

    fn current_phone(&mut self) -> Option<PhoneNumber> {
        if self.phone.is_none() {
            warn!(state = ?self.state, "no submitted phone in a phone-dependent state, resetting");
            self.state = FlowState::AwaitingPhone;
            self.session = None;
            self.error = Some(FlowError::ServiceUnavailable(
                "flow lost its phone number".to_string(),
            ));
        }
        self.phone.clone()
    }
}
