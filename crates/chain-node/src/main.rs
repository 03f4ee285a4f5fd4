mod fetch;
mod routes;

use chain_core::{Blockchain, PeerRegistry};
use chain_storage::sled_store::SledStore;
use chain_storage::Storage;
use clap::Parser;
use fetch::HttpChainFetcher;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:8080
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Data directory for sled
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Identity credited by mining rewards; random when not given
    #[arg(long)]
    node_id: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<RwLock<Blockchain>>,
    pub peers: Arc<RwLock<PeerRegistry>>,
    pub store: Arc<SledStore>,
    pub fetcher: Arc<HttpChainFetcher>,
    pub node_id: String,
    pub mining_cancel: Arc<AtomicBool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let node_id = args.node_id.clone().unwrap_or_else(random_node_id);
    info!(%node_id, "node identity");

    let store = Arc::new(SledStore::open(&args.data_dir)?);
    let persisted = store.load_chain()?;
    let chain = if persisted.is_empty() {
        info!("no persisted blocks, starting from genesis");
        Blockchain::new()
    } else {
        info!(blocks = persisted.len(), "loaded persisted chain");
        Blockchain::from_blocks(persisted)?
    };

    let mut peers = PeerRegistry::new();
    peers.register(&format!("http://{}", args.listen))?;

    let state = AppState {
        chain: Arc::new(RwLock::new(chain)),
        peers: Arc::new(RwLock::new(peers)),
        store,
        fetcher: Arc::new(HttpChainFetcher::new()?),
        node_id,
        mining_cancel: Arc::new(AtomicBool::new(false)),
    };

    let app = routes::router(state.clone());

    let addr: SocketAddr = args.listen.parse()?;
    info!("chain-node listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown(state.mining_cancel.clone()))
        .await?;
    Ok(())
}

async fn shutdown(mining_cancel: Arc<AtomicBool>) {
    let _ = tokio::signal::ctrl_c().await;
    // stop any in-flight proof search so the process can exit
    mining_cancel.store(true, Ordering::Relaxed);
    info!("shutting down");
}

fn random_node_id() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}
