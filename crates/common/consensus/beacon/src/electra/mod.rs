pub mod execution_payload;
pub mod withdrawal_state;
