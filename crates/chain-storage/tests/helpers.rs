use chain_core::constants::POW_DIFFICULTY;
use chain_core::pow::proof_of_work;
use chain_core::{Block, Blockchain};
use chain_storage::sled_store::SledStore;
use std::sync::atomic::AtomicBool;
use tempfile::{tempdir, TempDir};

pub fn create_temp_store() -> (TempDir, SledStore) {
    // Create a temporary directory for the sled database
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().to_path_buf();
    (
        temp_dir,
        SledStore::open(db_path.to_str().unwrap()).expect("Failed to open SledStore"),
    )
}

/// Builds a properly mined chain of `len` blocks starting from genesis.
pub fn mined_chain(len: usize) -> Vec<Block> {
    let cancel = AtomicBool::new(false);
    let mut chain = Blockchain::new();
    for height in 1..len {
        chain.new_transaction("alice", "bob", height as u64, None);
        let last_proof = chain.last_block().unwrap().proof;
        let proof = proof_of_work(last_proof, POW_DIFFICULTY, &cancel).unwrap();
        chain.new_block(proof, None).unwrap();
    }
    chain.blocks().to_vec()
}
