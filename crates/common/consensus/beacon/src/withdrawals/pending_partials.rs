use std::cmp::min;

use ream_network_spec::presets::WithdrawalPreset;
use tracing::{debug, trace};

use super::{DeductionLedger, SelectedWithdrawal, WithdrawalBudget};
use crate::{
    errors::WithdrawalsError, pending_partial_withdrawal::PendingPartialWithdrawal,
    validator::Validator,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingPartialsOutcome {
    /// Withdrawals in queue order.
    pub withdrawals: Vec<SelectedWithdrawal>,
    /// Length of the queue prefix consumed, whether or not an entry paid out.
    pub processed_count: usize,
    pub ledger: DeductionLedger,
}

/// Drain a bounded prefix of the pending partial withdrawals queue.
///
/// Scanning stops at the first entry that is not yet withdrawable, once the shared budget is
/// exhausted, or after `MAX_PENDING_PARTIALS_PER_WITHDRAWALS_SWEEP` entries. Every scanned entry
/// is consumed, including those that pay nothing.
pub fn process_pending_partial_withdrawals(
    pending_partial_withdrawals: &[PendingPartialWithdrawal],
    validators: &[Validator],
    balances: &[u64],
    epoch: u64,
    budget: &mut WithdrawalBudget,
    preset: &WithdrawalPreset,
) -> Result<PendingPartialsOutcome, WithdrawalsError> {
    let mut outcome = PendingPartialsOutcome::default();
    let limit = min(
        pending_partial_withdrawals.len(),
        preset.max_pending_partials_per_withdrawals_sweep as usize,
    );

    for pending in &pending_partial_withdrawals[..limit] {
        if !pending.is_withdrawable(epoch) || budget.is_exhausted() {
            break;
        }
        outcome.processed_count += 1;

        let validator_index = pending.validator_index;
        let validator = validators
            .get(validator_index as usize)
            .ok_or(WithdrawalsError::ValidatorIndexOutOfBounds(validator_index))?;
        let balance = *balances
            .get(validator_index as usize)
            .ok_or(WithdrawalsError::BalanceIndexOutOfBounds(validator_index))?;
        let remaining = outcome.ledger.remaining_balance(validator_index, balance)?;

        if validator.effective_balance < preset.min_activation_balance
            || validator.has_initiated_exit()
            || remaining <= validator.effective_balance
        {
            trace!(validator_index, remaining, "Skipping pending partial withdrawal");
            continue;
        }

        let amount = min(remaining - validator.effective_balance, pending.amount);
        trace!(validator_index, amount, "Pending partial withdrawal");
        outcome.withdrawals.push(SelectedWithdrawal {
            validator_index,
            address: validator.withdrawal_address(),
            amount,
        });
        outcome.ledger.deduct(validator_index, amount);
        budget.consume();
    }

    debug!(
        processed = outcome.processed_count,
        withdrawals = outcome.withdrawals.len(),
        "Processed pending partial withdrawals"
    );
    Ok(outcome)
}
