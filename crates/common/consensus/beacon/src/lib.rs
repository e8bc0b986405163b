#![warn(clippy::unwrap_used)]

pub mod electra;
pub mod errors;
pub mod pending_partial_withdrawal;
pub mod validator;
pub mod withdrawal;
pub mod withdrawals;
