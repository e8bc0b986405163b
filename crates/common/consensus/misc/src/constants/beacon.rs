pub const FAR_FUTURE_EPOCH: u64 = 18446744073709551615;

// Withdrawal credential prefixes
pub const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;
pub const ETH1_ADDRESS_WITHDRAWAL_PREFIX: u8 = 0x01;
pub const COMPOUNDING_WITHDRAWAL_PREFIX: u8 = 0x02;

/// Execution address occupies the last 20 bytes of a 0x01/0x02 credential.
pub const WITHDRAWAL_ADDRESS_OFFSET: usize = 12;
