use std::{path::PathBuf, sync::Arc};

use alloy_primitives::B256;
use clap::Parser;
use ream_consensus_beacon::{
    electra::{execution_payload::calculate_withdrawals_root, withdrawal_state::WithdrawalState},
    withdrawal::Withdrawal,
};
use ream_network_spec::{cli::preset_parser, presets::WithdrawalPreset};
use serde::Serialize;
use tracing::info;

use crate::{cli::constants::DEFAULT_PRESET, snapshot::read_snapshot};

#[derive(Debug, Parser)]
pub struct ExpectedConfig {
    #[arg(long, help = "Beacon state snapshot (.json, .ssz or .ssz_snappy)")]
    pub state: PathBuf,

    #[arg(
        long,
        help = "Choose mainnet, minimal or provide a path to a YAML preset file",
        default_value = DEFAULT_PRESET,
        value_parser = preset_parser
    )]
    pub preset: Arc<WithdrawalPreset>,
}

#[derive(Debug, Serialize)]
pub struct ExpectedWithdrawalsReport {
    pub withdrawals: Vec<Withdrawal>,
    #[serde(with = "serde_utils::quoted_u64")]
    pub processed_partial_withdrawals_count: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub next_withdrawal_index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub next_withdrawal_validator_index: u64,
    pub withdrawals_root: B256,
}

pub fn run_expected(config: ExpectedConfig) -> anyhow::Result<ExpectedWithdrawalsReport> {
    let state: WithdrawalState = read_snapshot(&config.state)?;
    info!(
        slot = state.slot,
        validators = state.validators.len(),
        pending_partial_withdrawals = state.pending_partial_withdrawals.len(),
        "Loaded state"
    );

    let expected = state.get_expected_withdrawals(&config.preset)?;
    let next_withdrawal_index = state.next_withdrawal_index + expected.withdrawals.len() as u64;
    Ok(ExpectedWithdrawalsReport {
        withdrawals_root: calculate_withdrawals_root(&expected.withdrawals),
        processed_partial_withdrawals_count: expected.processed_partial_withdrawals_count as u64,
        next_withdrawal_index,
        next_withdrawal_validator_index: expected.next_withdrawal_validator_index,
        withdrawals: expected.withdrawals,
    })
}
