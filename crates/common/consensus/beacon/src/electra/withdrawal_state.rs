use std::{collections::BTreeMap, mem::take, ops::Deref};

use anyhow::{anyhow, ensure};
use itertools::Itertools;
use ream_consensus_misc::misc::compute_epoch_at_slot;
use ream_network_spec::presets::WithdrawalPreset;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{
    VariableList,
    serde_utils::quoted_u64_var_list,
    typenum::{U134217728, U1099511627776},
};
use tracing::{info, warn};
use tree_hash_derive::TreeHash;

use super::execution_payload::ExecutionPayload;
use crate::{
    errors::WithdrawalsError,
    pending_partial_withdrawal::PendingPartialWithdrawal,
    validator::Validator,
    withdrawals::expected::{ExpectedWithdrawals, get_expected_withdrawals},
};

/// The part of the Electra beacon state read and written by withdrawal processing.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct WithdrawalState {
    #[serde(with = "serde_utils::quoted_u64")]
    pub slot: u64,

    // Registry
    pub validators: VariableList<Validator, U1099511627776>,
    #[serde(with = "quoted_u64_var_list")]
    pub balances: VariableList<u64, U1099511627776>,

    // Withdrawals
    #[serde(with = "serde_utils::quoted_u64")]
    pub next_withdrawal_index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub next_withdrawal_validator_index: u64,

    pub pending_partial_withdrawals: VariableList<PendingPartialWithdrawal, U134217728>,
}

impl WithdrawalState {
    /// Return the current epoch.
    pub fn get_current_epoch(&self, preset: &WithdrawalPreset) -> u64 {
        compute_epoch_at_slot(self.slot, preset.slots_per_epoch)
    }

    pub fn get_expected_withdrawals(
        &self,
        preset: &WithdrawalPreset,
    ) -> anyhow::Result<ExpectedWithdrawals> {
        Ok(get_expected_withdrawals(self, preset)?)
    }

    /// Verify ``payload`` carries exactly the expected withdrawals and apply them.
    ///
    /// On error the state is left untouched.
    pub fn process_withdrawals(
        &mut self,
        payload: &ExecutionPayload,
        preset: &WithdrawalPreset,
    ) -> anyhow::Result<()> {
        let expected_withdrawals = self.get_expected_withdrawals(preset)?;
        if payload.withdrawals.deref() != expected_withdrawals.withdrawals.as_slice() {
            warn!(
                slot = self.slot,
                expected = expected_withdrawals.withdrawals.len(),
                actual = payload.withdrawals.len(),
                "Payload withdrawals do not match expected withdrawals"
            );
            return Err(WithdrawalsError::PayloadMismatch {
                expected: expected_withdrawals.withdrawals.len(),
                actual: payload.withdrawals.len(),
            }
            .into());
        }

        self.apply_withdrawals(&expected_withdrawals)
    }

    /// Debit balances, drop the consumed queue prefix and advance both cursors.
    pub fn apply_withdrawals(&mut self, expected: &ExpectedWithdrawals) -> anyhow::Result<()> {
        ensure!(
            expected.processed_partial_withdrawals_count <= self.pending_partial_withdrawals.len(),
            "Processed {} pending partial withdrawals but only {} are queued",
            expected.processed_partial_withdrawals_count,
            self.pending_partial_withdrawals.len()
        );

        // Check every debit before touching any balance
        let totals: BTreeMap<u64, u64> = expected
            .withdrawals
            .iter()
            .map(|withdrawal| (withdrawal.validator_index, withdrawal.amount))
            .into_grouping_map()
            .sum()
            .into_iter()
            .collect();
        for (&validator_index, &amount) in &totals {
            let balance = *self
                .balances
                .get(validator_index as usize)
                .ok_or(WithdrawalsError::BalanceIndexOutOfBounds(validator_index))?;
            if amount > balance {
                return Err(WithdrawalsError::WithdrawalExceedsBalance {
                    validator_index,
                    amount,
                    balance,
                }
                .into());
            }
        }

        for withdrawal in &expected.withdrawals {
            self.decrease_balance(withdrawal.validator_index, withdrawal.amount)?;
        }

        let remaining_partial_withdrawals = Vec::from(take(&mut self.pending_partial_withdrawals))
            .into_iter()
            .skip(expected.processed_partial_withdrawals_count)
            .collect::<Vec<_>>();
        self.pending_partial_withdrawals = VariableList::new(remaining_partial_withdrawals)
            .map_err(|err| anyhow!("Failed to rebuild pending_partial_withdrawals: {err:?}"))?;

        self.next_withdrawal_index += expected.withdrawals.len() as u64;
        if !self.validators.is_empty() {
            self.next_withdrawal_validator_index = expected.next_withdrawal_validator_index;
        }

        info!(
            slot = self.slot,
            withdrawals = expected.withdrawals.len(),
            processed_partial_withdrawals = expected.processed_partial_withdrawals_count,
            next_withdrawal_index = self.next_withdrawal_index,
            next_withdrawal_validator_index = self.next_withdrawal_validator_index,
            "Processed withdrawals"
        );
        Ok(())
    }

    /// Decrease the validator balance at index ``index`` by ``delta``.
    ///
    /// A debit larger than the balance is rejected rather than clamped.
    pub fn decrease_balance(&mut self, index: u64, delta: u64) -> anyhow::Result<()> {
        let balance = self
            .balances
            .get_mut(index as usize)
            .ok_or(WithdrawalsError::BalanceIndexOutOfBounds(index))?;
        *balance = balance
            .checked_sub(delta)
            .ok_or(WithdrawalsError::WithdrawalExceedsBalance {
                validator_index: index,
                amount: delta,
                balance: *balance,
            })?;
        Ok(())
    }

    /// Append a request to the tail of the pending partial withdrawals queue.
    ///
    /// The queue must stay ordered by ``withdrawable_epoch`` for withdrawal processing to stop
    /// at its first not yet withdrawable entry.
    pub fn push_pending_partial_withdrawal(
        &mut self,
        pending_partial_withdrawal: PendingPartialWithdrawal,
    ) -> anyhow::Result<()> {
        if let Some(tail) = self.pending_partial_withdrawals.last() {
            ensure!(
                tail.withdrawable_epoch <= pending_partial_withdrawal.withdrawable_epoch,
                WithdrawalsError::UnorderedPendingPartialWithdrawal {
                    validator_index: pending_partial_withdrawal.validator_index,
                    withdrawable_epoch: pending_partial_withdrawal.withdrawable_epoch,
                    tail_epoch: tail.withdrawable_epoch,
                }
            );
        }
        self.pending_partial_withdrawals
            .push(pending_partial_withdrawal)
            .map_err(|err| {
                anyhow!("Failed to push partial_withdrawal to pending_partial_withdrawals: {err:?}")
            })
    }

    /// Register a validator together with its balance.
    pub fn add_validator(&mut self, validator: Validator, balance: u64) -> anyhow::Result<()> {
        self.validators
            .push(validator)
            .map_err(|err| anyhow!("Couldn't push to validators {err:?}"))?;
        self.balances
            .push(balance)
            .map_err(|err| anyhow!("Couldn't push to balances {err:?}"))?;
        Ok(())
    }
}
