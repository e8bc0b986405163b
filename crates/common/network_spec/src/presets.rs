use std::sync::{Arc, LazyLock};

use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// Capacity of the withdrawals list in an execution payload. No preset may ask for more
/// withdrawals per payload than a payload can carry.
pub const MAX_WITHDRAWALS_PER_PAYLOAD_LIMIT: u64 = 16;

/// Preset values consumed by withdrawal processing.
///
/// Field names follow the consensus-specs preset files, so a merged
/// `capella.yaml`/`electra.yaml`/`phase0.yaml` preset deserializes directly. Keys missing from
/// the file fall back to the mainnet value; unrelated keys are ignored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct WithdrawalPreset {
    /// Legacy effective balance cap and the activation threshold for queued withdrawals.
    pub min_activation_balance: u64,
    /// Effective balance cap of compounding validators.
    pub max_effective_balance_electra: u64,
    pub effective_balance_increment: u64,
    pub max_withdrawals_per_payload: u64,
    pub max_pending_partials_per_withdrawals_sweep: u64,
    pub max_validators_per_withdrawals_sweep: u64,
    pub slots_per_epoch: u64,
}

impl WithdrawalPreset {
    pub const fn mainnet() -> Self {
        Self {
            min_activation_balance: 32_000_000_000,
            max_effective_balance_electra: 2_048_000_000_000,
            effective_balance_increment: 1_000_000_000,
            max_withdrawals_per_payload: 16,
            max_pending_partials_per_withdrawals_sweep: 8,
            max_validators_per_withdrawals_sweep: 16384,
            slots_per_epoch: 32,
        }
    }

    pub const fn minimal() -> Self {
        Self {
            min_activation_balance: 32_000_000_000,
            max_effective_balance_electra: 2_048_000_000_000,
            effective_balance_increment: 1_000_000_000,
            max_withdrawals_per_payload: 4,
            max_pending_partials_per_withdrawals_sweep: 2,
            max_validators_per_withdrawals_sweep: 16,
            slots_per_epoch: 8,
        }
    }

    /// Reject presets under which withdrawal processing would make no progress or could
    /// not bound its work.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.slots_per_epoch > 0, "SLOTS_PER_EPOCH must be non-zero");
        ensure!(
            self.max_withdrawals_per_payload > 0,
            "MAX_WITHDRAWALS_PER_PAYLOAD must be non-zero"
        );
        ensure!(
            self.max_withdrawals_per_payload <= MAX_WITHDRAWALS_PER_PAYLOAD_LIMIT,
            "MAX_WITHDRAWALS_PER_PAYLOAD ({}) exceeds the payload list limit ({})",
            self.max_withdrawals_per_payload,
            MAX_WITHDRAWALS_PER_PAYLOAD_LIMIT
        );
        ensure!(
            self.max_validators_per_withdrawals_sweep > 0,
            "MAX_VALIDATORS_PER_WITHDRAWALS_SWEEP must be non-zero"
        );
        ensure!(
            self.effective_balance_increment > 0,
            "EFFECTIVE_BALANCE_INCREMENT must be non-zero"
        );
        ensure!(
            self.min_activation_balance <= self.max_effective_balance_electra,
            "MIN_ACTIVATION_BALANCE ({}) must not exceed MAX_EFFECTIVE_BALANCE_ELECTRA ({})",
            self.min_activation_balance,
            self.max_effective_balance_electra
        );
        ensure!(
            self.min_activation_balance % self.effective_balance_increment == 0
                && self.max_effective_balance_electra % self.effective_balance_increment == 0,
            "effective balance caps must be multiples of EFFECTIVE_BALANCE_INCREMENT"
        );
        Ok(())
    }
}

impl Default for WithdrawalPreset {
    fn default() -> Self {
        Self::mainnet()
    }
}

pub static MAINNET: LazyLock<Arc<WithdrawalPreset>> =
    LazyLock::new(|| WithdrawalPreset::mainnet().into());

pub static MINIMAL: LazyLock<Arc<WithdrawalPreset>> =
    LazyLock::new(|| WithdrawalPreset::minimal().into());
