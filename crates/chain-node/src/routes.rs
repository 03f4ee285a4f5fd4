use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chain_core::constants::{POW_DIFFICULTY, REWARD_AMOUNT, REWARD_SENDER};
use chain_core::{consensus, pow, Block, Transaction};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::error;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chain", get(chain))
        .route("/nodes", get(nodes))
        .route("/mine", get(mine))
        .route("/transactions/new", post(new_transaction))
        .route("/nodes/register", post(register_nodes))
        .route("/nodes/resolve", get(resolve))
        .route("/save", get(save))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire shape of the chain-read endpoint; also what the consensus fetcher
/// decodes from peers, so blocks round-trip exactly.
#[derive(Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize)]
struct MineResponse {
    message: &'static str,
    index: u64,
    transactions: Vec<Transaction>,
    proof: u64,
    previous_hash: String,
}

async fn chain(State(state): State<AppState>) -> Json<ChainResponse> {
    let chain = state.chain.read().await;
    Json(ChainResponse {
        chain: chain.blocks().to_vec(),
        length: chain.len(),
    })
}

async fn nodes(State(state): State<AppState>) -> Json<Value> {
    let peers = state.peers.read().await;
    Json(json!({
        "nodes": peers.peers(),
        "length": peers.len(),
    }))
}

async fn mine(State(state): State<AppState>) -> Result<Json<MineResponse>, StatusCode> {
    // snapshot the puzzle input, then search without holding any lock
    let last_proof = {
        let chain = state.chain.read().await;
        chain
            .last_block()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
            .proof
    };

    let cancel = state.mining_cancel.clone();
    let proof = tokio::task::spawn_blocking(move || {
        pow::proof_of_work(last_proof, POW_DIFFICULTY, &cancel)
    })
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let Some(proof) = proof else {
        // shutdown raised the cancel flag mid-search
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let block = {
        let mut chain = state.chain.write().await;
        chain.new_transaction(REWARD_SENDER, state.node_id.clone(), REWARD_AMOUNT, None);
        chain
            .new_block(proof, None)
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
    };

    Ok(Json(MineResponse {
        message: "New Block Forged",
        index: block.index,
        transactions: block.transactions.clone(),
        proof: block.proof,
        previous_hash: hex::encode(block.previous_hash),
    }))
}

async fn new_transaction(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let (Some(sender), Some(recipient), Some(amount)) = (
        body.get("sender").and_then(Value::as_str),
        body.get("recipient").and_then(Value::as_str),
        body.get("amount").and_then(Value::as_u64),
    ) else {
        return (StatusCode::BAD_REQUEST, "Missing values").into_response();
    };
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    let index = state
        .chain
        .write()
        .await
        .new_transaction(sender, recipient, amount, message);

    (
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Transaction will be added to Block {index}"),
        })),
    )
        .into_response()
}

async fn register_nodes(State(state): State<AppState>, Json(body): Json<Value>) -> Response {
    let Some(addresses) = body.get("nodes").and_then(Value::as_array) else {
        return (
            StatusCode::BAD_REQUEST,
            "Error: Please supply a valid list of nodes",
        )
            .into_response();
    };
    if addresses.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "Error: Please supply a valid list of nodes",
        )
            .into_response();
    }

    let mut peers = state.peers.write().await;
    for address in addresses {
        let Some(address) = address.as_str() else {
            return (StatusCode::BAD_REQUEST, "Error: Nodes must be strings").into_response();
        };
        if let Err(err) = peers.register(address) {
            return (StatusCode::BAD_REQUEST, err.to_string()).into_response();
        }
    }

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "New nodes have been added",
            "total_nodes": peers.peers(),
        })),
    )
        .into_response()
}

async fn resolve(State(state): State<AppState>) -> Json<Value> {
    // network calls happen before the write lock is taken; only the final
    // swap runs under it
    let peers = state.peers.read().await.peers();
    let candidates = consensus::fetch_candidates(state.fetcher.as_ref(), &peers).await;

    let mut chain = state.chain.write().await;
    let replaced =
        match consensus::select_longer_chain(chain.len(), candidates, POW_DIFFICULTY) {
            Some(best) => {
                chain.replace(best);
                true
            }
            None => false,
        };

    if replaced {
        Json(json!({
            "message": "Our chain was replaced",
            "new_chain": chain.blocks(),
            "length": chain.len(),
        }))
    } else {
        Json(json!({
            "message": "Our chain is authoritative",
            "chain": chain.blocks(),
            "length": chain.len(),
        }))
    }
}

async fn save(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    use chain_storage::Storage;

    let chain = state.chain.read().await;
    match state.store.save_blocks(chain.blocks()) {
        Ok(written) => Ok(Json(json!({
            "message": "Chain state saved",
            "changed_blocks": written,
        }))),
        Err(err) => {
            // save is retryable; the chain itself is untouched
            error!(%err, "failed to persist chain");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
