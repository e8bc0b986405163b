use alloy_primitives::Address;
use alloy_rlp::RlpEncodable;
use ream_consensus_misc::misc::checksummed_address;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash_derive::TreeHash;

#[derive(
    Debug, PartialEq, Eq, Clone, Serialize, Deserialize, Encode, Decode, TreeHash, RlpEncodable,
)]
pub struct Withdrawal {
    #[serde(with = "serde_utils::quoted_u64")]
    pub index: u64,
    #[serde(with = "serde_utils::quoted_u64")]
    pub validator_index: u64,
    #[serde(with = "checksummed_address")]
    pub address: Address,
    #[serde(with = "serde_utils::quoted_u64")]
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_withdrawal_beacon_api_json() {
        let withdrawal = Withdrawal {
            index: 7,
            validator_index: 42,
            address: address!("0x00000000219ab540356cbb839cbe05303d7705fa"),
            amount: 1_000_000_000,
        };

        let json = serde_json::to_string(&withdrawal).expect("serialize withdrawal");
        assert_eq!(
            json,
            r#"{"index":"7","validator_index":"42","address":"0x00000000219ab540356cBB839Cbe05303d7705Fa","amount":"1000000000"}"#
        );
        assert_eq!(
            serde_json::from_str::<Withdrawal>(&json).expect("deserialize withdrawal"),
            withdrawal
        );
    }
}
