//! Per-slot withdrawal selection.
//!
//! Withdrawals come from two sources that share one per-payload budget: the queue of pending
//! partial withdrawals ([pending_partials]) and a bounded round-robin sweep of the validator
//! registry ([sweep]). Queue-driven deductions are recorded in a [DeductionLedger] that the sweep
//! consults in the same slot. [expected] merges both streams and assigns global indices.

pub mod expected;
pub mod pending_partials;
pub mod sweep;

use std::collections::HashMap;

use alloy_primitives::Address;

use crate::errors::WithdrawalsError;

/// A withdrawal chosen for this slot whose global index has not been assigned yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedWithdrawal {
    pub validator_index: u64,
    pub address: Address,
    pub amount: u64,
}

/// Shared counter of withdrawals emitted in the current slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalBudget {
    used: u64,
    limit: u64,
}

impl WithdrawalBudget {
    pub fn new(limit: u64) -> Self {
        Self { used: 0, limit }
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    fn consume(&mut self) {
        self.used += 1;
    }
}

/// Amounts already earmarked per validator by the pending-withdrawals queue during this slot.
///
/// Lives only for one call of the expected-withdrawals computation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeductionLedger(HashMap<u64, u64>);

impl DeductionLedger {
    pub fn deducted(&self, validator_index: u64) -> u64 {
        self.0.get(&validator_index).copied().unwrap_or_default()
    }

    pub fn deduct(&mut self, validator_index: u64, amount: u64) {
        *self.0.entry(validator_index).or_default() += amount;
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Balance of ``validator_index`` left after this slot's earlier deductions.
    pub fn remaining_balance(
        &self,
        validator_index: u64,
        balance: u64,
    ) -> Result<u64, WithdrawalsError> {
        let deducted = self.deducted(validator_index);
        balance
            .checked_sub(deducted)
            .ok_or(WithdrawalsError::WithdrawalExceedsBalance {
                validator_index,
                amount: deducted,
                balance,
            })
    }
}
