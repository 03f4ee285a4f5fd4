pub const POW_DIFFICULTY: usize = 4;
pub const GENESIS_INDEX: u64 = 1;
pub const GENESIS_PROOF: u64 = 100;
pub const GENESIS_PREVIOUS_HASH: crate::Hash = [0u8; 32];
pub const REWARD_SENDER: &str = "0";
pub const REWARD_AMOUNT: u64 = 1;
