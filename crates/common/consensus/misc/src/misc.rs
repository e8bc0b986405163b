use alloy_primitives::{Address, B256};

use crate::constants::beacon::{
    COMPOUNDING_WITHDRAWAL_PREFIX, ETH1_ADDRESS_WITHDRAWAL_PREFIX, WITHDRAWAL_ADDRESS_OFFSET,
};

pub mod checksummed_address {
    use alloy_primitives::Address;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(address: &Address, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let checksummed = address.to_checksum(None);
        serializer.serialize_str(&checksummed)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        s.parse::<Address>().map_err(D::Error::custom)
    }
}

/// Return the epoch number at ``slot``.
pub fn compute_epoch_at_slot(slot: u64, slots_per_epoch: u64) -> u64 {
    slot / slots_per_epoch
}

pub fn is_eth1_withdrawal_credential(withdrawal_credentials: B256) -> bool {
    withdrawal_credentials[0] == ETH1_ADDRESS_WITHDRAWAL_PREFIX
}

pub fn is_compounding_withdrawal_credential(withdrawal_credentials: B256) -> bool {
    withdrawal_credentials[0] == COMPOUNDING_WITHDRAWAL_PREFIX
}

/// Build a withdrawal credential of the form ``prefix || 0x00 * 11 || address``.
pub fn withdrawal_credential_from_address(prefix: u8, address: Address) -> B256 {
    let mut credentials = B256::ZERO;
    credentials[0] = prefix;
    credentials[WITHDRAWAL_ADDRESS_OFFSET..].copy_from_slice(address.as_slice());
    credentials
}
