use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("chain has no blocks")]
    EmptyChain,
    #[error("invalid peer address: {0}")]
    InvalidAddress(String),
    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },
    #[error("chain failed validation: {0}")]
    InvalidChain(String),
}
