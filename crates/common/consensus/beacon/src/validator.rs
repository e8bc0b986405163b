use alloy_primitives::{Address, B256};
use ream_consensus_misc::{
    constants::beacon::{
        BLS_WITHDRAWAL_PREFIX, COMPOUNDING_WITHDRAWAL_PREFIX, ETH1_ADDRESS_WITHDRAWAL_PREFIX,
        FAR_FUTURE_EPOCH, WITHDRAWAL_ADDRESS_OFFSET,
    },
    misc::{is_compounding_withdrawal_credential, is_eth1_withdrawal_credential},
};
use ream_network_spec::presets::WithdrawalPreset;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{FixedVector, serde_utils::hex_fixed_vec, typenum::U48};
use tree_hash_derive::TreeHash;

/// Routing of a validator's withdrawable funds, decoded from the credential prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalCredential {
    /// 0x00, no execution address established yet.
    Bls,
    /// 0x01, legacy execution address.
    Eth1(Address),
    /// 0x02, compounding execution address.
    Compounding(Address),
    Unknown(u8),
}

impl WithdrawalCredential {
    pub fn from_credentials(withdrawal_credentials: B256) -> Self {
        let address = || Address::from_slice(&withdrawal_credentials[WITHDRAWAL_ADDRESS_OFFSET..]);
        match withdrawal_credentials[0] {
            BLS_WITHDRAWAL_PREFIX => Self::Bls,
            ETH1_ADDRESS_WITHDRAWAL_PREFIX => Self::Eth1(address()),
            COMPOUNDING_WITHDRAWAL_PREFIX => Self::Compounding(address()),
            prefix => Self::Unknown(prefix),
        }
    }

    pub fn execution_address(&self) -> Option<Address> {
        match self {
            Self::Eth1(address) | Self::Compounding(address) => Some(*address),
            Self::Bls | Self::Unknown(_) => None,
        }
    }

    pub fn is_execution(&self) -> bool {
        self.execution_address().is_some()
    }

    /// Effective balance cap that applies to this credential kind.
    pub fn max_effective_balance(&self, preset: &WithdrawalPreset) -> u64 {
        match self {
            Self::Compounding(_) => preset.max_effective_balance_electra,
            Self::Bls | Self::Eth1(_) | Self::Unknown(_) => preset.min_activation_balance,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct Validator {
    #[serde(with = "hex_fixed_vec")]
    pub pubkey: FixedVector<u8, U48>,

    /// Commitment to pubkey for withdrawals
    pub withdrawal_credentials: B256,

    /// Balance at stake
    #[serde(with = "serde_utils::quoted_u64")]
    pub effective_balance: u64,
    pub slashed: bool,

    /// When criteria for activation were met
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_eligibility_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub activation_epoch: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub exit_epoch: u64,

    /// When validator can withdraw funds
    #[serde(with = "serde_utils::quoted_u64")]
    pub withdrawable_epoch: u64,
}

impl Validator {
    pub fn withdrawal_credential(&self) -> WithdrawalCredential {
        WithdrawalCredential::from_credentials(self.withdrawal_credentials)
    }

    /// Check if ``validator`` has an 0x01 prefixed "eth1" withdrawal credential.
    pub fn has_eth1_withdrawal_credential(&self) -> bool {
        is_eth1_withdrawal_credential(self.withdrawal_credentials)
    }

    /// Check if ``validator`` has an 0x02 prefixed "compounding" withdrawal credential.
    pub fn has_compounding_withdrawal_credential(&self) -> bool {
        is_compounding_withdrawal_credential(self.withdrawal_credentials)
    }

    /// Check if ``validator`` has a 0x01 or 0x02 prefixed withdrawal credential.
    pub fn has_execution_withdrawal_credential(&self) -> bool {
        self.withdrawal_credential().is_execution()
    }

    /// Execution address funds are sent to; the last 20 bytes of the credential.
    pub fn withdrawal_address(&self) -> Address {
        Address::from_slice(&self.withdrawal_credentials[WITHDRAWAL_ADDRESS_OFFSET..])
    }

    /// Get max effective balance for ``validator``.
    pub fn get_max_effective_balance(&self, preset: &WithdrawalPreset) -> u64 {
        self.withdrawal_credential().max_effective_balance(preset)
    }

    pub fn has_initiated_exit(&self) -> bool {
        self.exit_epoch != FAR_FUTURE_EPOCH
    }

    /// Check if ``validator`` is fully withdrawable.
    pub fn is_fully_withdrawable_validator(&self, balance: u64, epoch: u64) -> bool {
        self.has_execution_withdrawal_credential()
            && self.withdrawable_epoch <= epoch
            && balance > 0
    }

    /// Check if ``validator`` is partially withdrawable.
    ///
    /// The effective balance has to sit exactly at the cap for the credential kind; any gap
    /// left by an earlier balance reduction disqualifies the validator until its effective
    /// balance is recomputed.
    pub fn is_partially_withdrawable_validator(
        &self,
        balance: u64,
        preset: &WithdrawalPreset,
    ) -> bool {
        self.has_execution_withdrawal_credential()
            && self.effective_balance == self.get_max_effective_balance(preset)
            && balance > self.effective_balance
    }
}
