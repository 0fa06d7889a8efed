use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use std::fmt;

use super::crypto::ContentHash;
use super::transaction::Transaction;

/// Proof carried by the genesis block
pub const GENESIS_PROOF: u64 = 100;

/// Previous hash carried by the genesis block
pub const GENESIS_PREVIOUS_HASH: u64 = 1;

/// Link from a block to its predecessor
///
/// Genesis has no predecessor and carries a fixed integer instead of a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviousHash {
    Sentinel(u64),
    Digest(String),
}

impl PreviousHash {
    fn to_wire_format(&self) -> Value {
        match self {
            PreviousHash::Sentinel(value) => json!(value),
            PreviousHash::Digest(hash) => json!(hash),
        }
    }
}

impl fmt::Display for PreviousHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviousHash::Sentinel(value) => write!(f, "{}", value),
            PreviousHash::Digest(hash) => write!(f, "{}", hash),
        }
    }
}

/// Represents a block in the blockchain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Block {
    /// Index of the block in the chain
    pub index: u64,

    /// Creation time in seconds since the Unix epoch
    pub timestamp: f64,

    /// List of transactions sealed by this block
    pub transactions: Vec<Transaction>,

    /// Proof of work
    pub proof: u64,

    /// Hash of the previous block
    #[schema(value_type = String, example = "00e06c672cf57bedd84988524edfe6db6b6e7169d894234e704aa5f6b4c40071")]
    pub previous_hash: PreviousHash,
}

impl Block {
    /// Creates a new block stamped with the current time
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the block in the chain
    /// * `transactions` - The transactions to seal into the block
    /// * `proof` - The proof of work
    /// * `previous_hash` - The hash of the previous block
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: PreviousHash,
    ) -> Self {
        Block {
            index,
            timestamp: now_seconds(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// Creates the genesis block (first block in the chain)
    pub fn genesis() -> Self {
        Block::new(
            0,
            Vec::new(),
            GENESIS_PROOF,
            PreviousHash::Sentinel(GENESIS_PREVIOUS_HASH),
        )
    }
}

impl ContentHash for Block {
    fn to_wire_format(&self) -> Value {
        let transactions: Vec<Value> = self
            .transactions
            .iter()
            .map(ContentHash::to_wire_format)
            .collect();

        json!({
            "index": self.index,
            "timestamp": self.timestamp,
            "transactions": transactions,
            "proof": self.proof,
            "previous_hash": self.previous_hash.to_wire_format(),
        })
    }
}

fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_block() -> Block {
        Block {
            index: 2,
            timestamp: 1_700_000_000.5,
            transactions: vec![
                Transaction::new("alice", "bob", 10),
                Transaction::new("bob", "carol", 3),
            ],
            proof: 226,
            previous_hash: PreviousHash::Digest("abc".to_string()),
        }
    }

    #[test]
    fn test_genesis_block() {
        let block = Block::genesis();

        assert_eq!(block.index, 0);
        assert!(block.transactions.is_empty());
        assert_eq!(block.proof, GENESIS_PROOF);
        assert_eq!(block.previous_hash, PreviousHash::Sentinel(1));
        assert!(block.timestamp > 0.0);
    }

    #[test]
    fn test_wire_format_reduces_transactions() {
        let block = fixed_block();
        let wire = block.to_wire_format();

        assert_eq!(wire["index"], 2);
        assert_eq!(wire["proof"], 226);
        assert_eq!(wire["previous_hash"], "abc");
        assert_eq!(wire["transactions"][0]["sender"], "alice");
        assert_eq!(wire["transactions"][1]["amount"], 3);

        // The projection leaves the block untouched
        assert_eq!(block, fixed_block());
    }

    #[test]
    fn test_wire_format_matches_serde() {
        let block = fixed_block();
        assert_eq!(serde_json::to_value(&block).unwrap(), block.to_wire_format());

        let genesis = Block::genesis();
        let serialized = serde_json::to_value(&genesis).unwrap();
        assert_eq!(serialized["previous_hash"], 1);
        assert_eq!(serialized, genesis.to_wire_format());
    }

    #[test]
    fn test_previous_hash_round_trips_untagged() {
        let sentinel: PreviousHash = serde_json::from_str("1").unwrap();
        let digest: PreviousHash = serde_json::from_str("\"ff00\"").unwrap();

        assert_eq!(sentinel, PreviousHash::Sentinel(1));
        assert_eq!(digest, PreviousHash::Digest("ff00".to_string()));
        assert_eq!(digest.to_string(), "ff00");
    }

    #[test]
    fn test_calculate_hash() {
        let block = fixed_block();
        let hash = block.content_hash();

        assert_eq!(hash.len(), 64);
        assert_eq!(hash, fixed_block().content_hash());

        let mut tampered = fixed_block();
        tampered.transactions[0].amount = 11;
        assert_ne!(hash, tampered.content_hash());
    }
}
