use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Candidates are scanned in parallel batches this wide; the cancel flag is
/// checked between batches.
const BATCH: u64 = 1 << 16;

/// The puzzle predicate: SHA-256 of the ASCII concatenation of the previous
/// proof and the candidate, hex-encoded, must start with `difficulty` zero
/// characters.
pub fn valid_proof(last_proof: u64, proof: u64, difficulty: usize) -> bool {
    let mut hasher = Sha256::new();
    hasher.update(format!("{last_proof}{proof}").as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest.bytes().take(difficulty).all(|b| b == b'0')
}

/// Searches proof candidates from 0 upward until one satisfies
/// [`valid_proof`]. Each batch is scanned in parallel; the search stops and
/// returns `None` once `cancel` is raised, so a node can shut down mid-mine.
pub fn proof_of_work(last_proof: u64, difficulty: usize, cancel: &AtomicBool) -> Option<u64> {
    let mut start = 0u64;
    while start < u64::MAX {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        let end = start.saturating_add(BATCH);
        let found = (start..end)
            .into_par_iter()
            .find_any(|candidate| valid_proof(last_proof, *candidate, difficulty));
        if let Some(proof) = found {
            info!(last_proof, proof, "proof of work solved");
            return Some(proof);
        }
        start = end;
    }
    // proof space exhausted (practically impossible)
    None
}

/// Finds the smallest candidate that fails [`valid_proof`]. Test helper for
/// corrupting chains with a proof that is guaranteed invalid.
#[doc(hidden)]
pub fn invalid_proof_for(last_proof: u64, difficulty: usize) -> u64 {
    (0u64..)
        .find(|candidate| !valid_proof(last_proof, *candidate, difficulty))
        .expect("every candidate satisfied the puzzle")
}
