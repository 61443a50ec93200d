//! Session flow controller - what the login and registration screens talk to.
//!
//! The screen forwards intents (`submit_phone`, `submit_code`, field edits) and
//! renders [`FlowSnapshot`]s from [`SessionFlow::subscribe`]. Each submission
//! runs the machine/effect loop to completion before returning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info};

use super::commands::AuthCommand;
use super::effects::AuthEffect;
use super::errors::{FlowError, FlowErrorKind};
use super::events::AuthEvent;
use super::machines::{FlowState, SessionMachine};
use super::messages::user_message;
use super::models::{FlowMode, PhoneNumber, VerificationCode, VerificationSession};
use crate::common::Locale;
use crate::kernel::AuthDeps;

/// What the screen renders: the current state and at most one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSnapshot {
    pub state: FlowState,
    pub error: Option<FlowErrorKind>,
    /// Localized text for `error`; `None` for errors the user cannot act on.
    pub error_message: Option<String>,
}

impl FlowSnapshot {
    fn initial() -> Self {
        Self {
            state: FlowState::AwaitingPhone,
            error: None,
            error_message: None,
        }
    }
}

/// Clears the in-flight flag when a submission finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SessionFlow {
    machine: Mutex<SessionMachine>,
    effect: AuthEffect,
    in_flight: AtomicBool,
    phone_digit_count: usize,
    locale: Locale,
    snapshot: watch::Sender<FlowSnapshot>,
}

impl SessionFlow {
    pub fn new(mode: FlowMode, deps: AuthDeps) -> Self {
        let (snapshot, _) = watch::channel(FlowSnapshot::initial());
        Self {
            machine: Mutex::new(SessionMachine::new(mode)),
            phone_digit_count: deps.phone_digit_count,
            locale: deps.locale,
            effect: AuthEffect::new(deps),
            in_flight: AtomicBool::new(false),
            snapshot,
        }
    }

    pub fn login(deps: AuthDeps) -> Self {
        Self::new(FlowMode::Login, deps)
    }

    pub fn registration(deps: AuthDeps) -> Self {
        Self::new(FlowMode::Registration, deps)
    }

    pub fn mode(&self) -> FlowMode {
        self.machine().mode()
    }

    pub fn state(&self) -> FlowState {
        self.machine().state()
    }

    pub fn session(&self) -> Option<VerificationSession> {
        self.machine().session().cloned()
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.snapshot.subscribe()
    }

    /// Registration name field. Stored verbatim.
    pub fn set_name(&self, name: impl Into<String>) {
        self.machine().set_name(name.into());
    }

    /// Registration e-mail field. Stored verbatim.
    pub fn set_email(&self, email: impl Into<String>) {
        self.machine().set_email(email.into());
    }

    /// The phone input was edited; drops the visible error.
    pub fn phone_changed(&self) {
        self.machine().clear_error();
        self.publish();
    }

    /// The code input was edited; drops the visible error.
    pub fn code_changed(&self) {
        self.machine().clear_error();
        self.publish();
    }

    /// The screen was left. Any outstanding challenge is simply forgotten.
    pub fn leave(&self) {
        self.machine().decide(&AuthEvent::Left);
        self.publish();
    }

    /// Submit (or resubmit) the phone number.
    ///
    /// Malformed input fails with `InvalidPhoneFormat` before any service is
    /// contacted. Otherwise the account lookup runs first and the code is only
    /// requested if the lookup admits the number for this flow's mode.
    ///
    /// A flow that reached `Authenticated` is finished: the input is not
    /// parsed, no service is contacted and `Ok(Authenticated)` is returned.
    /// Start a new `SessionFlow` to sign in again.
    pub async fn submit_phone(&self, raw: &str) -> Result<FlowState, FlowError> {
        let _in_flight = self.begin()?;

        if self.state() == FlowState::Authenticated {
            debug!("phone submitted after authentication, flow already finished");
            return Ok(FlowState::Authenticated);
        }

        let phone = match PhoneNumber::parse(raw, self.phone_digit_count) {
            Ok(phone) => phone,
            Err(e) => {
                debug!(error = %e, "phone input rejected locally");
                return Err(self.fail(e.into()));
            }
        };

        info!(phone = %phone.fingerprint(), mode = ?self.mode(), "phone submitted");
        self.drive(AuthEvent::PhoneSubmitted { phone }).await
    }

    /// Submit the code typed by the user.
    pub async fn submit_code(&self, raw: &str) -> Result<FlowState, FlowError> {
        let _in_flight = self.begin()?;

        if self.machine().session().is_none() {
            return Err(self.fail(FlowError::NoActiveChallenge));
        }
        let Some(code) = VerificationCode::parse(raw) else {
            debug!("code input rejected locally");
            return Err(self.fail(FlowError::InvalidCode));
        };

        self.drive(AuthEvent::CodeSubmitted { code }).await
    }

    /// Feed an event and keep executing commands until the machine rests.
    async fn drive(&self, event: AuthEvent) -> Result<FlowState, FlowError> {
        let mut next = self.decide(&event);
        while let Some(cmd) = next {
            let outcome = self.effect.execute(cmd).await;
            next = self.decide(&outcome);
        }

        let machine = self.machine();
        match machine.error() {
            Some(error) => Err(error.clone()),
            None => Ok(machine.state()),
        }
    }

    fn decide(&self, event: &AuthEvent) -> Option<AuthCommand> {
        let cmd = self.machine().decide(event);
        self.publish();
        cmd
    }

    fn begin(&self) -> Result<InFlight<'_>, FlowError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            debug!("submission rejected, previous one still in flight");
            return Err(FlowError::StepInFlight);
        }
        Ok(InFlight(&self.in_flight))
    }

    fn fail(&self, error: FlowError) -> FlowError {
        self.machine().fail(error.clone());
        self.publish();
        error
    }

    fn publish(&self) {
        let snapshot = {
            let machine = self.machine();
            let error = machine.error().map(FlowError::kind);
            FlowSnapshot {
                state: machine.state(),
                error,
                error_message: error
                    .and_then(|kind| user_message(kind, self.locale))
                    .map(str::to_string),
            }
        };
        self.snapshot.send_replace(snapshot);
    }

    fn machine(&self) -> MutexGuard<'_, SessionMachine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
