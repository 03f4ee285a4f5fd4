use crate::Storage;
use anyhow::Result;
use chain_core::{Block, Hash};
use sled::Db;
use std::path::Path;
use tracing::info;

const TREE_BLOCKS: &str = "blocks";
const KEY_TIP_INDEX: &[u8] = b"tip_index";
const KEY_TIP_FINGERPRINT: &[u8] = b"tip_fingerprint";

#[derive(Clone)]
pub struct SledStore {
    db: Db,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        info!("sled store opened");
        Ok(Self { db })
    }

    fn blocks(&self) -> sled::Tree {
        self.db.open_tree(TREE_BLOCKS).expect("open tree")
    }

    fn set_tip(&self, block: &Block) -> Result<()> {
        self.db.insert(KEY_TIP_INDEX, &block.index.to_be_bytes())?;
        self.db.insert(KEY_TIP_FINGERPRINT, &block.fingerprint())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.blocks().clear()?;
        self.db.remove(KEY_TIP_INDEX)?;
        self.db.remove(KEY_TIP_FINGERPRINT)?;
        self.db.flush()?;
        Ok(())
    }
}

impl Storage for SledStore {
    fn put_block(&self, block: &Block) -> Result<()> {
        let bytes = bincode::serialize(block)?;
        self.blocks().insert(block.index.to_be_bytes(), bytes)?;
        self.set_tip(block)?;
        self.db.flush()?;
        Ok(())
    }

    fn get_block(&self, index: u64) -> Result<Option<Block>> {
        match self.blocks().get(index.to_be_bytes())? {
            Some(ivec) => Ok(Some(bincode::deserialize::<Block>(&ivec)?)),
            None => Ok(None),
        }
    }

    fn tip_index(&self) -> Result<u64> {
        Ok(self
            .db
            .get(KEY_TIP_INDEX)?
            .map(|v| {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&v);
                u64::from_be_bytes(arr)
            })
            .unwrap_or(0))
    }

    fn tip_fingerprint(&self) -> Result<Option<Hash>> {
        Ok(self.db.get(KEY_TIP_FINGERPRINT)?.map(|v| {
            let mut arr = [0u8; 32];
            arr.copy_from_slice(&v);
            arr
        }))
    }

    fn save_blocks(&self, blocks: &[Block]) -> Result<usize> {
        let tree = self.blocks();
        let mut written = 0usize;
        for block in blocks {
            let bytes = bincode::serialize(block)?;
            let key = block.index.to_be_bytes();
            // already-durable blocks stay untouched; a record only changes
            // after a consensus replacement rewrote that index
            if tree.get(key)?.as_deref() == Some(bytes.as_slice()) {
                continue;
            }
            tree.insert(key, bytes)?;
            written += 1;
        }
        if written > 0 {
            if let Some(tip) = blocks.last() {
                self.set_tip(tip)?;
            }
            self.db.flush()?;
            info!(written, "persisted blocks");
        }
        Ok(written)
    }

    fn load_chain(&self) -> Result<Vec<Block>> {
        // big-endian index keys make the tree scan ascend in block order
        let mut chain = Vec::new();
        for entry in self.blocks().iter() {
            let (_, ivec) = entry?;
            chain.push(bincode::deserialize(&ivec)?);
        }
        Ok(chain)
    }
}
