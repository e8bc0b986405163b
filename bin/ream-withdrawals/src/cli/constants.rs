pub const DEFAULT_PRESET: &str = "mainnet";
pub const DEFAULT_VERBOSITY: &str = "3";
