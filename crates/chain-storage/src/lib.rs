pub mod sled_store;

use anyhow::Result;
use chain_core::{Block, Hash};

/// Contract for durable block persistence. One record per block index;
/// saving is incremental (already-durable blocks are left untouched) and
/// loading returns blocks in ascending index order.
pub trait Storage: Send + Sync {
    fn put_block(&self, block: &Block) -> Result<()>;
    fn get_block(&self, index: u64) -> Result<Option<Block>>;
    /// Index of the highest stored block, 0 when nothing is stored.
    fn tip_index(&self) -> Result<u64>;
    fn tip_fingerprint(&self) -> Result<Option<Hash>>;
    /// Writes every block whose stored record is absent or differs, and
    /// returns how many records changed. Blocks already durable are not
    /// rewritten.
    fn save_blocks(&self, blocks: &[Block]) -> Result<usize>;
    /// All persisted blocks, ascending by index. Empty when the store is
    /// fresh; the caller then starts from genesis.
    fn load_chain(&self) -> Result<Vec<Block>>;
}
