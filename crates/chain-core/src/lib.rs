use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod chain;
pub mod consensus;
pub mod constants;
pub mod error;
pub mod peers;
pub mod pow;

pub use chain::Blockchain;
pub use consensus::ChainFetcher;
pub use error::ChainError;
pub use peers::PeerRegistry;

pub type Hash = [u8; 32];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Transaction {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
        message: Option<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            message,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub index: u64,
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: Hash,
}

impl Block {
    pub fn new(index: u64, transactions: Vec<Transaction>, proof: u64, previous_hash: Hash) -> Self {
        Self {
            index,
            timestamp: unix_timestamp(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Canonical byte encoding fed to the fingerprint hash. Field order is
    /// fixed: index (LE), timestamp (LE), each transaction's JSON in block
    /// order (sender, recipient, amount, message only when present),
    /// proof (LE), previous_hash (raw). Any node encoding the same block
    /// content produces the same bytes.
    pub fn fingerprint_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + 8 + 8 + 32);
        bytes.extend_from_slice(&self.index.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        for tx in &self.transactions {
            bytes.extend_from_slice(&serde_json::to_vec(tx).unwrap());
        }
        bytes.extend_from_slice(&self.proof.to_le_bytes());
        bytes.extend_from_slice(&self.previous_hash);
        bytes
    }

    /// SHA-256 digest of the canonical encoding. The next block's
    /// `previous_hash` must equal this value.
    pub fn fingerprint(&self) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(self.fingerprint_bytes());
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest[..]);
        out
    }
}

pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_txs() -> Vec<Transaction> {
        vec![
            Transaction::new("alice", "bob", 10, None),
            Transaction::new("bob", "charlie", 5, Some("lunch".to_string())),
        ]
    }

    #[test]
    fn transaction_serialization_omits_absent_message() {
        let tx = Transaction::new("alice", "bob", 5, None);
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(json, r#"{"sender":"alice","recipient":"bob","amount":5}"#);
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }

    #[test]
    fn transaction_serialization_keeps_message() {
        let tx = Transaction::new("alice", "bob", 5, Some("rent".to_string()));
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(
            json,
            r#"{"sender":"alice","recipient":"bob","amount":5,"message":"rent"}"#
        );
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }

    #[test]
    fn fingerprint_bytes_layout_without_transactions() {
        let mut block = Block::new(3, vec![], 42, [7u8; 32]);
        block.timestamp = 1_600_000_000;
        let bytes = block.fingerprint_bytes();
        assert_eq!(bytes.len(), 8 + 8 + 8 + 32);
        assert_eq!(&bytes[0..8], &3u64.to_le_bytes());
        assert_eq!(&bytes[8..16], &1_600_000_000u64.to_le_bytes());
        assert_eq!(&bytes[16..24], &42u64.to_le_bytes());
        assert_eq!(&bytes[24..56], &[7u8; 32]);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let mut block = Block::new(1, sample_txs(), 100, [0u8; 32]);
        block.timestamp = 1_600_000_000;
        assert_eq!(block.fingerprint(), block.fingerprint());
    }

    #[test]
    fn fingerprint_covers_every_field() {
        let mut base = Block::new(1, sample_txs(), 100, [0u8; 32]);
        base.timestamp = 1_600_000_000;
        let original = base.fingerprint();

        let mut changed = base.clone();
        changed.index += 1;
        assert_ne!(original, changed.fingerprint());

        let mut changed = base.clone();
        changed.timestamp += 1;
        assert_ne!(original, changed.fingerprint());

        let mut changed = base.clone();
        changed.proof += 1;
        assert_ne!(original, changed.fingerprint());

        let mut changed = base.clone();
        changed.previous_hash[0] ^= 0xff;
        assert_ne!(original, changed.fingerprint());

        let mut changed = base.clone();
        changed.transactions[0].amount += 1;
        assert_ne!(original, changed.fingerprint());

        let mut changed = base.clone();
        changed.transactions.reverse();
        assert_ne!(original, changed.fingerprint());
    }

    #[test]
    fn block_round_trips_through_json() {
        let block = Block::new(2, sample_txs(), 35293, [9u8; 32]);
        let json = serde_json::to_string(&block).unwrap();
        let back: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block, back);
        assert_eq!(block.fingerprint(), back.fingerprint());
    }
}
