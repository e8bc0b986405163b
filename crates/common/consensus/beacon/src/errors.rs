use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WithdrawalsError {
    #[error(
        "Withdrawals do not match expected withdrawals: expected {expected} withdrawals, payload has {actual}"
    )]
    PayloadMismatch { expected: usize, actual: usize },
    #[error(
        "Withdrawal of {amount} from validator {validator_index} exceeds its balance of {balance}"
    )]
    WithdrawalExceedsBalance {
        validator_index: u64,
        amount: u64,
        balance: u64,
    },
    #[error("Validator index out of bounds: {0}")]
    ValidatorIndexOutOfBounds(u64),
    #[error("Balance index out of bounds: {0}")]
    BalanceIndexOutOfBounds(u64),
    #[error(
        "Pending partial withdrawal for validator {validator_index} is withdrawable at epoch {withdrawable_epoch}, before the queue tail at epoch {tail_epoch}"
    )]
    UnorderedPendingPartialWithdrawal {
        validator_index: u64,
        withdrawable_epoch: u64,
        tail_epoch: u64,
    },
    #[error("Produced {count} withdrawals, above the per-payload cap of {limit}")]
    TooManyWithdrawals { count: usize, limit: u64 },
    #[error("Invalid withdrawal preset: {0}")]
    InvalidPreset(String),
}
