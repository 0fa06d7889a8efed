use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::blockchain::{Block, PreviousHash, Transaction};

/// Response for the chain endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChainResponse {
    /// The blocks in the chain
    pub chain: Vec<Block>,

    /// The length of the chain
    pub length: usize,
}

/// Request for the transaction endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct TransactionRequest {
    /// The sender's address
    pub sender: String,

    /// The recipient's address
    pub recipient: String,

    /// The amount to transfer
    pub amount: i64,
}

/// Response for the transaction endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub message: String,

    /// The index reported for the block that will include this transaction
    pub block_index: u64,
}

/// Response for the mine endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,

    #[schema(value_type = String)]
    pub previous_hash: PreviousHash,
}

impl MineResponse {
    pub fn forged(block: &Block) -> Self {
        MineResponse {
            message: "New Block Forged".to_string(),
            index: block.index,
            transactions: block.transactions.clone(),
            proof: block.proof,
            previous_hash: block.previous_hash.clone(),
        }
    }
}

/// Response for the validate endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ValidationResponse {
    /// Whether every link and proof in the chain checks out
    pub valid: bool,

    /// Why the chain is invalid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request for the difficulty endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DifficultyRequest {
    /// Number of leading zero hex digits required of a proof digest
    pub difficulty: i64,
}

/// Response for the difficulty endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DifficultyResponse {
    pub difficulty: usize,
}
