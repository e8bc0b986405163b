use std::cmp::min;

use ream_network_spec::presets::WithdrawalPreset;
use tracing::{debug, trace};

use super::{DeductionLedger, SelectedWithdrawal, WithdrawalBudget};
use crate::{errors::WithdrawalsError, validator::Validator};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Withdrawals in visit order.
    pub withdrawals: Vec<SelectedWithdrawal>,
    pub visited: usize,
    /// Registry index the next sweep starts from.
    pub next_validator_index: u64,
}

/// Round-robin scan of the registry starting at ``start_index``.
///
/// Visits at most `min(len(validators), MAX_VALIDATORS_PER_WITHDRAWALS_SWEEP)` validators and
/// stops early once the shared budget is exhausted. Balances are taken net of the queue
/// deductions recorded in ``ledger``.
pub fn sweep_for_withdrawals(
    start_index: u64,
    validators: &[Validator],
    balances: &[u64],
    epoch: u64,
    ledger: &DeductionLedger,
    budget: &mut WithdrawalBudget,
    preset: &WithdrawalPreset,
) -> Result<SweepOutcome, WithdrawalsError> {
    let validator_count = validators.len() as u64;
    if validator_count == 0 {
        return Ok(SweepOutcome {
            next_validator_index: start_index,
            ..Default::default()
        });
    }

    let bound = min(
        validators.len(),
        preset.max_validators_per_withdrawals_sweep as usize,
    );
    let mut outcome = SweepOutcome::default();
    // The registry may have grown or shrunk since the cursor was stored.
    let mut validator_index = start_index % validator_count;

    while outcome.visited < bound && !budget.is_exhausted() {
        let validator = &validators[validator_index as usize];
        let balance = *balances
            .get(validator_index as usize)
            .ok_or(WithdrawalsError::BalanceIndexOutOfBounds(validator_index))?;
        let balance = ledger.remaining_balance(validator_index, balance)?;

        let amount = if validator.is_fully_withdrawable_validator(balance, epoch) {
            Some(balance)
        } else if validator.is_partially_withdrawable_validator(balance, preset) {
            Some(balance - validator.effective_balance)
        } else {
            None
        };

        if let Some(amount) = amount {
            trace!(validator_index, amount, "Sweep withdrawal");
            outcome.withdrawals.push(SelectedWithdrawal {
                validator_index,
                address: validator.withdrawal_address(),
                amount,
            });
            budget.consume();
        }

        outcome.visited += 1;
        validator_index = (validator_index + 1) % validator_count;
    }

    outcome.next_validator_index = validator_index;
    debug!(
        start_index,
        visited = outcome.visited,
        withdrawals = outcome.withdrawals.len(),
        next_validator_index = outcome.next_validator_index,
        queue_deductions = !ledger.is_empty(),
        remaining_budget = budget.remaining(),
        "Swept validator registry"
    );
    Ok(outcome)
}
