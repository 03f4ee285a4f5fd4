use crate::error::ChainError;
use std::collections::HashSet;

/// The set of known peer nodes, stored as normalized `host:port`
/// authorities. Lives for the process lifetime only.
#[derive(Debug, Clone, Default)]
pub struct PeerRegistry {
    nodes: HashSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a peer, normalizing the address first. Returns `false` when the
    /// peer was already known (re-registration is a no-op).
    pub fn register(&mut self, address: &str) -> Result<bool, ChainError> {
        let authority = normalize_address(address)?;
        Ok(self.nodes.insert(authority))
    }

    pub fn contains(&self, authority: &str) -> bool {
        self.nodes.contains(authority)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The registered authorities, sorted for stable listings.
    pub fn peers(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.nodes.iter().cloned().collect();
        peers.sort();
        peers
    }
}

/// Accepts `scheme://host:port[/path]` or a bare `host:port` and returns the
/// authority part. Structural checks only; the address is never probed for
/// reachability.
fn normalize_address(address: &str) -> Result<String, ChainError> {
    let rest = address
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(address);
    let authority = rest.split('/').next().unwrap_or("").trim();
    if authority.is_empty() {
        return Err(ChainError::InvalidAddress(address.to_string()));
    }
    if let Some((host, port)) = authority.rsplit_once(':') {
        if host.is_empty() || port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ChainError::InvalidAddress(address.to_string()));
        }
    }
    Ok(authority.to_string())
}
