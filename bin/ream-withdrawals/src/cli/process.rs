use std::{path::PathBuf, sync::Arc};

use alloy_primitives::B256;
use clap::Parser;
use ream_consensus_beacon::electra::{
    execution_payload::ExecutionPayload, withdrawal_state::WithdrawalState,
};
use ream_network_spec::{cli::preset_parser, presets::WithdrawalPreset};
use serde::Serialize;
use tracing::info;
use tree_hash::TreeHash;

use crate::{
    cli::constants::DEFAULT_PRESET,
    snapshot::{read_snapshot, write_snapshot},
};

#[derive(Debug, Parser)]
pub struct ProcessConfig {
    #[arg(long, help = "Pre-state snapshot (.json, .ssz or .ssz_snappy)")]
    pub state: PathBuf,

    #[arg(long, help = "Execution payload carrying the withdrawals (.json, .ssz or .ssz_snappy)")]
    pub payload: PathBuf,

    #[arg(long, help = "Where to write the post-state; the format follows the extension")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Choose mainnet, minimal or provide a path to a YAML preset file",
        default_value = DEFAULT_PRESET,
        value_parser = preset_parser
    )]
    pub preset: Arc<WithdrawalPreset>,
}

#[derive(Debug, Serialize)]
pub struct ProcessReport {
    #[serde(with = "serde_utils::quoted_u64")]
    pub applied_withdrawals: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub next_withdrawal_index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub next_withdrawal_validator_index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub pending_partial_withdrawals: u64,
    pub state_root: B256,
}

pub fn run_process(config: ProcessConfig) -> anyhow::Result<ProcessReport> {
    let mut state: WithdrawalState = read_snapshot(&config.state)?;
    let payload: ExecutionPayload = read_snapshot(&config.payload)?;

    state.process_withdrawals(&payload, &config.preset)?;

    if let Some(output) = &config.output {
        write_snapshot(output, &state)?;
        info!(path = %output.display(), "Wrote post-state");
    }

    Ok(ProcessReport {
        applied_withdrawals: payload.withdrawals.len() as u64,
        next_withdrawal_index: state.next_withdrawal_index,
        next_withdrawal_validator_index: state.next_withdrawal_validator_index,
        pending_partial_withdrawals: state.pending_partial_withdrawals.len() as u64,
        state_root: state.tree_hash_root(),
    })
}

#[cfg(test)]
mod tests {
    use ream_consensus_beacon::validator::Validator;
    use ssz_types::VariableList;

    use super::*;
    use crate::cli::expected::{ExpectedConfig, run_expected};

    const GWEI_PER_ETH: u64 = 1_000_000_000;

    fn eth1_validator(last_byte: u8) -> Validator {
        let mut withdrawal_credentials = B256::ZERO;
        withdrawal_credentials[0] = 0x01;
        withdrawal_credentials[31] = last_byte;
        Validator {
            withdrawal_credentials,
            effective_balance: 32 * GWEI_PER_ETH,
            exit_epoch: u64::MAX,
            withdrawable_epoch: u64::MAX,
            ..Default::default()
        }
    }

    #[test]
    fn test_expected_then_process() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let state_path = dir.path().join("pre.json");
        let payload_path = dir.path().join("payload.ssz_snappy");
        let output_path = dir.path().join("post.json");
        let preset = Arc::new(WithdrawalPreset::minimal());

        let mut state = WithdrawalState::default();
        state
            .add_validator(eth1_validator(1), 32 * GWEI_PER_ETH)
            .expect("add validator");
        state
            .add_validator(eth1_validator(2), 33 * GWEI_PER_ETH)
            .expect("add validator");
        write_snapshot(&state_path, &state).expect("write state");

        let report = run_expected(ExpectedConfig {
            state: state_path.clone(),
            preset: preset.clone(),
        })
        .expect("expected withdrawals");
        assert_eq!(report.withdrawals.len(), 1);
        assert_eq!(report.withdrawals[0].validator_index, 1);
        assert_eq!(report.withdrawals[0].amount, GWEI_PER_ETH);

        let payload = ExecutionPayload {
            withdrawals: VariableList::new(report.withdrawals).expect("withdrawals fit"),
            ..Default::default()
        };
        write_snapshot(&payload_path, &payload).expect("write payload");

        let report = run_process(ProcessConfig {
            state: state_path,
            payload: payload_path,
            output: Some(output_path.clone()),
            preset,
        })
        .expect("process withdrawals");
        assert_eq!(report.applied_withdrawals, 1);
        assert_eq!(report.next_withdrawal_index, 1);

        let post_state: WithdrawalState = read_snapshot(&output_path).expect("read post-state");
        assert_eq!(post_state.balances.to_vec(), vec![32 * GWEI_PER_ETH; 2]);
        assert_eq!(report.state_root, post_state.tree_hash_root());
    }

    #[test]
    fn test_process_rejects_foreign_payload() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let state_path = dir.path().join("pre.json");
        let payload_path = dir.path().join("payload.json");

        let mut state = WithdrawalState::default();
        state
            .add_validator(eth1_validator(1), 33 * GWEI_PER_ETH)
            .expect("add validator");
        write_snapshot(&state_path, &state).expect("write state");
        write_snapshot(&payload_path, &ExecutionPayload::default()).expect("write payload");

        let result = run_process(ProcessConfig {
            state: state_path,
            payload: payload_path,
            output: None,
            preset: Arc::new(WithdrawalPreset::minimal()),
        });
        assert!(result.is_err());
    }
}
