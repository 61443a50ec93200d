// Eventify account access - core
//
// Phone number login and registration for the mobile client: an account
// existence gate in front of an OTP state machine. Screens render the
// snapshots this crate publishes and forward user input into it.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
