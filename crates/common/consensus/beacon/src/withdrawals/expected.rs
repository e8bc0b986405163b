use ream_network_spec::presets::WithdrawalPreset;

use super::{
    SelectedWithdrawal, WithdrawalBudget, pending_partials::process_pending_partial_withdrawals,
    sweep::sweep_for_withdrawals,
};
use crate::{
    electra::withdrawal_state::WithdrawalState, errors::WithdrawalsError, withdrawal::Withdrawal,
};

/// Everything a slot's withdrawal processing will apply to the state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedWithdrawals {
    pub withdrawals: Vec<Withdrawal>,
    pub processed_partial_withdrawals_count: usize,
    pub next_withdrawal_validator_index: u64,
}

/// Concatenate queue withdrawals ahead of sweep withdrawals and number them from
/// ``next_withdrawal_index``.
pub fn accumulate_withdrawals(
    next_withdrawal_index: u64,
    pending_partial_withdrawals: Vec<SelectedWithdrawal>,
    swept_withdrawals: Vec<SelectedWithdrawal>,
) -> Vec<Withdrawal> {
    pending_partial_withdrawals
        .into_iter()
        .chain(swept_withdrawals)
        .zip(next_withdrawal_index..)
        .map(|(selected, index)| Withdrawal {
            index,
            validator_index: selected.validator_index,
            address: selected.address,
            amount: selected.amount,
        })
        .collect()
}

fn ensure_within_payload_cap(
    withdrawals: &[Withdrawal],
    preset: &WithdrawalPreset,
) -> Result<(), WithdrawalsError> {
    if withdrawals.len() as u64 > preset.max_withdrawals_per_payload {
        return Err(WithdrawalsError::TooManyWithdrawals {
            count: withdrawals.len(),
            limit: preset.max_withdrawals_per_payload,
        });
    }
    Ok(())
}

/// Compute the withdrawals the next payload must carry, without mutating ``state``.
pub fn get_expected_withdrawals(
    state: &WithdrawalState,
    preset: &WithdrawalPreset,
) -> Result<ExpectedWithdrawals, WithdrawalsError> {
    preset
        .validate()
        .map_err(|err| WithdrawalsError::InvalidPreset(format!("{err:#}")))?;

    let epoch = state.get_current_epoch(preset);
    let mut budget = WithdrawalBudget::new(preset.max_withdrawals_per_payload);

    let pending = process_pending_partial_withdrawals(
        &state.pending_partial_withdrawals,
        &state.validators,
        &state.balances,
        epoch,
        &mut budget,
        preset,
    )?;
    let sweep = sweep_for_withdrawals(
        state.next_withdrawal_validator_index,
        &state.validators,
        &state.balances,
        epoch,
        &pending.ledger,
        &mut budget,
        preset,
    )?;

    let withdrawals = accumulate_withdrawals(
        state.next_withdrawal_index,
        pending.withdrawals,
        sweep.withdrawals,
    );
    ensure_within_payload_cap(&withdrawals, preset)?;

    Ok(ExpectedWithdrawals {
        withdrawals,
        processed_partial_withdrawals_count: pending.processed_count,
        next_withdrawal_validator_index: sweep.next_validator_index,
    })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Address;

    use super::*;

    fn selected(validator_index: u64, amount: u64) -> SelectedWithdrawal {
        SelectedWithdrawal {
            validator_index,
            address: Address::with_last_byte(validator_index as u8),
            amount,
        }
    }

    #[test]
    fn test_queue_withdrawals_come_first() {
        let withdrawals = accumulate_withdrawals(
            100,
            vec![selected(9, 1), selected(3, 2)],
            vec![selected(1, 3)],
        );

        assert_eq!(
            withdrawals
                .iter()
                .map(|withdrawal| (withdrawal.index, withdrawal.validator_index, withdrawal.amount))
                .collect::<Vec<_>>(),
            vec![(100, 9, 1), (101, 3, 2), (102, 1, 3)]
        );
        assert_eq!(withdrawals[1].address, Address::with_last_byte(3));
    }

    #[test]
    fn test_empty_streams() {
        assert!(accumulate_withdrawals(5, vec![], vec![]).is_empty());
    }

    #[test]
    fn test_payload_cap_check() {
        let preset = WithdrawalPreset::minimal();
        let at_cap = accumulate_withdrawals(
            0,
            (0..4).map(|index| selected(index, 1)).collect(),
            vec![],
        );
        assert_eq!(ensure_within_payload_cap(&at_cap, &preset), Ok(()));

        let over_cap = accumulate_withdrawals(
            0,
            (0..3).map(|index| selected(index, 1)).collect(),
            (3..5).map(|index| selected(index, 1)).collect(),
        );
        assert_eq!(
            ensure_within_payload_cap(&over_cap, &preset),
            Err(WithdrawalsError::TooManyWithdrawals { count: 5, limit: 4 })
        );
    }

    #[test]
    fn test_invalid_preset_is_an_error() {
        let state = WithdrawalState {
            slot: 16,
            ..Default::default()
        };
        let preset = WithdrawalPreset {
            slots_per_epoch: 0,
            ..WithdrawalPreset::minimal()
        };

        assert!(matches!(
            get_expected_withdrawals(&state, &preset),
            Err(WithdrawalsError::InvalidPreset(message)) if message.contains("SLOTS_PER_EPOCH")
        ));
    }
}
