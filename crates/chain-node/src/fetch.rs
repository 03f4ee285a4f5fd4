use crate::routes::ChainResponse;
use async_trait::async_trait;
use chain_core::{Block, ChainError, ChainFetcher};
use std::time::Duration;

/// `ChainFetcher` backed by a real HTTP client. Peers are addressed by the
/// `host:port` authority the registry stores; a request timeout keeps one
/// slow peer from stalling resolution.
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, peer: &str) -> Result<Vec<Block>, ChainError> {
        let unreachable = |reason: String| ChainError::PeerUnreachable {
            peer: peer.to_string(),
            reason,
        };

        let url = format!("http://{peer}/chain");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| unreachable(err.to_string()))?;
        if !response.status().is_success() {
            return Err(unreachable(format!("status {}", response.status())));
        }
        let body: ChainResponse = response
            .json()
            .await
            .map_err(|err| unreachable(err.to_string()))?;
        Ok(body.chain)
    }
}
