#![allow(dead_code)]

use alloy_primitives::Address;
use ream_consensus_beacon::{
    electra::{execution_payload::ExecutionPayload, withdrawal_state::WithdrawalState},
    pending_partial_withdrawal::PendingPartialWithdrawal,
    validator::Validator,
    withdrawal::Withdrawal,
};
use ream_consensus_misc::{
    constants::beacon::{
        BLS_WITHDRAWAL_PREFIX, COMPOUNDING_WITHDRAWAL_PREFIX, ETH1_ADDRESS_WITHDRAWAL_PREFIX,
        FAR_FUTURE_EPOCH,
    },
    misc::withdrawal_credential_from_address,
};
use ream_network_spec::presets::WithdrawalPreset;
use ssz_types::VariableList;

pub const GWEI_PER_ETH: u64 = 1_000_000_000;
pub const VALIDATOR_COUNT: u64 = 32;
/// First slot of epoch 2 under the minimal preset.
pub const SLOT: u64 = 16;

pub fn preset() -> WithdrawalPreset {
    WithdrawalPreset::minimal()
}

pub fn address_for(index: u64) -> Address {
    Address::with_last_byte(index as u8 + 1)
}

/// Active validators with BLS credentials at the activation balance; nothing is withdrawable.
pub fn genesis_state(validator_count: u64) -> WithdrawalState {
    let preset = preset();
    let mut state = WithdrawalState {
        slot: SLOT,
        ..Default::default()
    };
    for index in 0..validator_count {
        state
            .add_validator(
                Validator {
                    withdrawal_credentials: withdrawal_credential_from_address(
                        BLS_WITHDRAWAL_PREFIX,
                        address_for(index),
                    ),
                    effective_balance: preset.min_activation_balance,
                    activation_eligibility_epoch: 0,
                    activation_epoch: 0,
                    exit_epoch: FAR_FUTURE_EPOCH,
                    withdrawable_epoch: FAR_FUTURE_EPOCH,
                    ..Default::default()
                },
                preset.min_activation_balance,
            )
            .expect("add validator");
    }
    state
}

pub fn current_epoch(state: &WithdrawalState) -> u64 {
    state.get_current_epoch(&preset())
}

fn set_credential_with_balance(
    state: &mut WithdrawalState,
    index: u64,
    prefix: u8,
    effective_balance: u64,
    balance: u64,
) {
    let validator = &mut state.validators[index as usize];
    validator.withdrawal_credentials =
        withdrawal_credential_from_address(prefix, address_for(index));
    validator.effective_balance = effective_balance;
    state.balances[index as usize] = balance;
}

pub fn set_eth1_withdrawal_credential_with_balance(
    state: &mut WithdrawalState,
    index: u64,
    effective_balance: u64,
    balance: u64,
) {
    set_credential_with_balance(
        state,
        index,
        ETH1_ADDRESS_WITHDRAWAL_PREFIX,
        effective_balance,
        balance,
    );
}

pub fn set_compounding_withdrawal_credential_with_balance(
    state: &mut WithdrawalState,
    index: u64,
    effective_balance: u64,
    balance: u64,
) {
    set_credential_with_balance(
        state,
        index,
        COMPOUNDING_WITHDRAWAL_PREFIX,
        effective_balance,
        balance,
    );
}

pub fn set_validator_fully_withdrawable(state: &mut WithdrawalState, index: u64) {
    let epoch = current_epoch(state);
    let validator = &mut state.validators[index as usize];
    validator.exit_epoch = epoch;
    validator.withdrawable_epoch = epoch;
}

/// Give ``index`` compounding credentials with ``amount`` of excess balance and queue a request
/// for exactly that amount.
pub fn prepare_pending_withdrawal(
    state: &mut WithdrawalState,
    index: u64,
    effective_balance: u64,
    amount: u64,
    withdrawable_epoch: u64,
) -> PendingPartialWithdrawal {
    set_compounding_withdrawal_credential_with_balance(
        state,
        index,
        effective_balance,
        effective_balance + amount,
    );
    let pending_partial_withdrawal = PendingPartialWithdrawal {
        validator_index: index,
        amount,
        withdrawable_epoch,
    };
    state
        .push_pending_partial_withdrawal(pending_partial_withdrawal.clone())
        .expect("push pending partial withdrawal");
    pending_partial_withdrawal
}

/// Queue a 1 ETH request, withdrawable now, against a compounding validator at the activation
/// balance.
pub fn prepare_default_pending_withdrawal(
    state: &mut WithdrawalState,
    index: u64,
) -> PendingPartialWithdrawal {
    let epoch = current_epoch(state);
    prepare_pending_withdrawal(
        state,
        index,
        preset().min_activation_balance,
        GWEI_PER_ETH,
        epoch,
    )
}

pub fn payload_with(withdrawals: Vec<Withdrawal>) -> ExecutionPayload {
    ExecutionPayload {
        withdrawals: VariableList::new(withdrawals).expect("withdrawals fit in payload"),
        ..Default::default()
    }
}

/// Build a payload carrying the expected withdrawals, process it, and return the withdrawals
/// together with the pre-state.
pub fn run_withdrawals_processing(
    state: &mut WithdrawalState,
) -> (Vec<Withdrawal>, WithdrawalState) {
    let preset = preset();
    let pre_state = state.clone();
    let expected = state
        .get_expected_withdrawals(&preset)
        .expect("expected withdrawals");
    let payload = payload_with(expected.withdrawals.clone());

    state
        .process_withdrawals(&payload, &preset)
        .expect("process withdrawals");

    assert_eq!(
        state.next_withdrawal_index,
        pre_state.next_withdrawal_index + expected.withdrawals.len() as u64
    );
    for withdrawal in &expected.withdrawals {
        assert_eq!(withdrawal.address, address_for(withdrawal.validator_index));
    }
    (expected.withdrawals, pre_state)
}

pub fn validator_indices(withdrawals: &[Withdrawal]) -> Vec<u64> {
    withdrawals
        .iter()
        .map(|withdrawal| withdrawal.validator_index)
        .collect()
}

pub fn amounts(withdrawals: &[Withdrawal]) -> Vec<u64> {
    withdrawals.iter().map(|withdrawal| withdrawal.amount).collect()
}
