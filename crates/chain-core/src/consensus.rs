use crate::chain::valid_chain;
use crate::error::ChainError;
use crate::Block;
use async_trait::async_trait;
use tracing::warn;

/// Fetches another node's full chain. The node backs this with an HTTP
/// client against the peer's chain endpoint; tests substitute in-memory
/// fakes so the resolution algorithm never touches the network.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, ChainError>;
}

/// Queries every peer for its chain, skipping any that cannot be reached.
/// One dead peer must never abort resolution for the rest. Callers must not
/// hold the chain lock across this call.
pub async fn fetch_candidates<F>(fetcher: &F, peers: &[String]) -> Vec<Vec<Block>>
where
    F: ChainFetcher + ?Sized,
{
    let mut candidates = Vec::with_capacity(peers.len());
    for peer in peers {
        match fetcher.fetch_chain(peer).await {
            Ok(chain) => candidates.push(chain),
            Err(err) => warn!(%peer, %err, "skipping unreachable peer"),
        }
    }
    candidates
}

/// The longest-valid-chain rule: among candidates that validate and are
/// strictly longer than `local_len`, pick the single longest. Equal length
/// keeps the local chain; an invalid chain is never adopted no matter how
/// long. Returns `None` when nothing qualifies.
pub fn select_longer_chain(
    local_len: usize,
    candidates: Vec<Vec<Block>>,
    difficulty: usize,
) -> Option<Vec<Block>> {
    let mut best: Option<Vec<Block>> = None;
    let mut best_len = local_len;
    for candidate in candidates {
        if candidate.len() > best_len && valid_chain(&candidate, difficulty) {
            best_len = candidate.len();
            best = Some(candidate);
        }
    }
    best
}
