use actix_web::{web, HttpResponse};
use log::{info, warn};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::schema::{
    ChainResponse, DifficultyRequest, DifficultyResponse, MineResponse, TransactionRequest,
    TransactionResponse, ValidationResponse,
};
use super::state::{ApiError, AppState};
use crate::blockchain::{Block, ContentHash, Ledger, ProofOfWork, Transaction};

/// Data structure for the node state
pub type NodeData = web::Data<AppState>;

/// Amount paid to this node for each block it mines
pub const MINING_REWARD: i64 = 1;

/// Identify the node
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Node identifier", body = String)
    )
)]
pub async fn home(state: NodeData) -> HttpResponse {
    HttpResponse::Ok().body(format!("Blockchain node {}", state.node_id))
}

/// Mine a new block
///
/// Searches for the next proof, rewards this node and seals every pending
/// transaction into a new block
#[utoipa::path(
    get,
    path = "/mine",
    responses(
        (status = 200, description = "Block mined successfully", body = MineResponse),
        (status = 409, description = "The chain changed while the proof was being searched"),
        (status = 503, description = "Proof search timed out")
    )
)]
pub async fn mine(state: NodeData) -> Result<HttpResponse, ApiError> {
    let (previous_proof, difficulty, previous_hash) = {
        let ledger = state.ledger()?;
        let tail = ledger.tail()?;
        (tail.proof, ledger.difficulty(), tail.content_hash())
    };

    let proof = search_proof(previous_proof, difficulty, state.mine_timeout).await?;

    let mut ledger = state.ledger()?;
    let block = commit_proof(&mut ledger, &state.node_id, proof, previous_hash)?;

    Ok(HttpResponse::Ok().json(MineResponse::forged(&block)))
}

// Seals the searched proof, unless the tail moved on while the lock was released.
fn commit_proof(
    ledger: &mut Ledger,
    node_id: &str,
    proof: u64,
    previous_hash: String,
) -> Result<Block, ApiError> {
    let tail = ledger.tail()?;
    if tail.content_hash() != previous_hash
        || !ProofOfWork::validate(tail.proof, proof, ledger.difficulty())
    {
        warn!("Discarding proof {}: the chain changed during the search", proof);
        return Err(ApiError::StaleTail);
    }

    ledger.add_pending(Transaction::reward(node_id, MINING_REWARD));
    let block = ledger.seal_block(proof, Some(previous_hash))?;

    Ok(block.clone())
}

// Runs the search on the blocking pool so request workers stay responsive.
async fn search_proof(
    previous_proof: u64,
    difficulty: usize,
    timeout: Option<Duration>,
) -> Result<u64, ApiError> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let search =
        web::block(move || ProofOfWork::search_cancellable(previous_proof, difficulty, &flag));

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, search).await {
            Ok(outcome) => outcome,
            Err(_) => {
                cancel.store(true, Ordering::Relaxed);
                warn!(
                    "Proof search at difficulty {} timed out after {:?}",
                    difficulty, limit
                );
                return Err(ApiError::MiningTimedOut(limit));
            }
        },
        None => search.await,
    };

    match outcome {
        Ok(Some(proof)) => Ok(proof),
        Ok(None) => Err(ApiError::MiningTimedOut(timeout.unwrap_or_default())),
        Err(err) => Err(ApiError::Blocking(err.to_string())),
    }
}

/// Get the full blockchain
#[utoipa::path(
    get,
    path = "/chain",
    responses(
        (status = 200, description = "Blockchain retrieved successfully", body = ChainResponse)
    )
)]
pub async fn full_chain(state: NodeData) -> Result<HttpResponse, ApiError> {
    let ledger = state.ledger()?;
    let chain = ledger.chain().to_vec();

    Ok(HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
    }))
}

/// Get all pending transactions
///
/// Returns all transactions waiting to be included in a block
#[utoipa::path(
    get,
    path = "/transactions/current",
    responses(
        (status = 200, description = "Pending transactions retrieved successfully", body = Vec<Transaction>)
    )
)]
pub async fn current_transactions(state: NodeData) -> Result<HttpResponse, ApiError> {
    let ledger = state.ledger()?;
    Ok(HttpResponse::Ok().json(ledger.pending_transactions()))
}

/// Create a new transaction
///
/// Adds a new transaction to the pending transactions
#[utoipa::path(
    post,
    path = "/transactions/new",
    request_body = TransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = TransactionResponse),
        (status = 400, description = "Missing or malformed values")
    )
)]
pub async fn new_transaction(
    state: NodeData,
    transaction_req: web::Json<TransactionRequest>,
) -> Result<HttpResponse, ApiError> {
    let TransactionRequest {
        sender,
        recipient,
        amount,
    } = transaction_req.into_inner();

    let block_index = state.ledger()?.add_transaction(sender, recipient, amount);

    Ok(HttpResponse::Created().json(TransactionResponse {
        message: format!("Transaction will be added to Block {}", block_index),
        block_index,
    }))
}

/// Check if the blockchain is valid
///
/// Re-derives every link hash and proof from genesis forward
#[utoipa::path(
    get,
    path = "/validate",
    responses(
        (status = 200, description = "Blockchain validation status", body = ValidationResponse)
    )
)]
pub async fn validate_chain(state: NodeData) -> Result<HttpResponse, ApiError> {
    let ledger = state.ledger()?;

    let response = match ledger.verify_chain() {
        Ok(()) => ValidationResponse {
            valid: true,
            error: None,
        },
        Err(err) => ValidationResponse {
            valid: false,
            error: Some(err.to_string()),
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Change the proof difficulty
///
/// Applies to blocks sealed from now on
#[utoipa::path(
    put,
    path = "/difficulty",
    request_body = DifficultyRequest,
    responses(
        (status = 200, description = "Difficulty updated", body = DifficultyResponse),
        (status = 400, description = "Negative difficulty")
    )
)]
pub async fn set_difficulty(
    state: NodeData,
    difficulty_req: web::Json<DifficultyRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut ledger = state.ledger()?;
    ledger.set_difficulty(difficulty_req.difficulty)?;
    info!("Difficulty set to {} over the API", ledger.difficulty());

    Ok(HttpResponse::Ok().json(DifficultyResponse {
        difficulty: ledger.difficulty(),
    }))
}
