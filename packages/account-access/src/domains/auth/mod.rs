//! Auth domain - phone number login and registration via one-time codes
//!
//! Architecture (machine decides, effect executes):
//!   Screen → SessionFlow → SessionMachine.decide(event) → AuthCommand
//!          → AuthEffect.execute(command) → AuthEvent → back into the machine
//!
//! Responsibilities:
//! - Phone number canonicalization and local validation
//! - Account existence gate (login needs an account, registration needs none)
//! - OTP request/confirmation through the identity service
//! - Account record creation after a confirmed registration

pub mod commands;
pub mod effects;
pub mod errors;
pub mod events;
pub mod flow;
pub mod gate;
pub mod machines;
pub mod messages;
pub mod models;

pub use commands::AuthCommand;
pub use effects::AuthEffect;
pub use errors::{FlowError, FlowErrorKind};
pub use events::AuthEvent;
pub use flow::{FlowSnapshot, SessionFlow};
pub use gate::AccountGate;
pub use machines::{FlowState, SessionMachine};
pub use models::FlowMode;
