use crate::constants::{GENESIS_INDEX, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, POW_DIFFICULTY};
use crate::error::ChainError;
use crate::pow::valid_proof;
use crate::{Block, Hash, Transaction};

/// The node's ledger state: the append-only block sequence plus the pool of
/// transactions waiting to be mined. Owned by exactly one place in the
/// process and handed around by reference.
#[derive(Debug, Clone)]
pub struct Blockchain {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
}

/// The first block of every fresh chain. `previous_hash` is the zeroed
/// sentinel; nothing ever links to a block before it.
pub fn genesis_block() -> Block {
    Block::new(GENESIS_INDEX, Vec::new(), GENESIS_PROOF, GENESIS_PREVIOUS_HASH)
}

/// A chain is valid when every block carries the fingerprint of its
/// predecessor and every adjacent proof pair satisfies the puzzle. A chain
/// of length <= 1 is trivially valid. Scans forward and stops at the first
/// violation.
pub fn valid_chain(blocks: &[Block], difficulty: usize) -> bool {
    blocks.windows(2).all(|pair| {
        let (prev, curr) = (&pair[0], &pair[1]);
        curr.previous_hash == prev.fingerprint()
            && valid_proof(prev.proof, curr.proof, difficulty)
    })
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// A fresh chain containing only the genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![genesis_block()],
            pending: Vec::new(),
        }
    }

    /// Rebuilds a chain from persisted blocks. The sequence must be
    /// non-empty and must already validate; anything else is refused rather
    /// than adopted.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, ChainError> {
        if blocks.is_empty() {
            return Err(ChainError::EmptyChain);
        }
        if !valid_chain(&blocks, POW_DIFFICULTY) {
            return Err(ChainError::InvalidChain(
                "loaded blocks do not form a valid chain".to_string(),
            ));
        }
        Ok(Self {
            blocks,
            pending: Vec::new(),
        })
    }

    /// Queues a transaction and returns the index of the block that will
    /// contain it. No solvency or signature checks.
    pub fn new_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
        message: Option<String>,
    ) -> u64 {
        self.pending
            .push(Transaction::new(sender, recipient, amount, message));
        self.blocks.len() as u64 + 1
    }

    pub fn last_block(&self) -> Result<&Block, ChainError> {
        self.blocks.last().ok_or(ChainError::EmptyChain)
    }

    /// Commits a new block: index follows the tip, transactions are the
    /// pending pool snapshot in insertion order (pool is emptied), and
    /// `previous_hash` defaults to the tip's fingerprint. The only mutation
    /// path outside consensus replacement.
    pub fn new_block(
        &mut self,
        proof: u64,
        previous_hash: Option<Hash>,
    ) -> Result<Block, ChainError> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.last_block()?.fingerprint(),
        };
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(
            self.blocks.len() as u64 + 1,
            transactions,
            proof,
            previous_hash,
        );
        self.blocks.push(block.clone());
        Ok(block)
    }

    /// Wholesale swap of the block sequence. Used only by consensus
    /// resolution, after the candidate has been validated.
    pub fn replace(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }
}
