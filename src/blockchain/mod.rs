// Blockchain module
//
// This module contains the ledger core:
// - Content hashing
// - Transaction and block structures
// - Proof of work algorithm
// - The ledger itself (chain and pending pool)

pub mod block;
pub mod crypto;
pub mod ledger;
pub mod pow;
pub mod transaction;

// Re-export main components for easier access
pub use block::{Block, PreviousHash};
pub use crypto::ContentHash;
pub use ledger::{Ledger, LedgerError};
pub use pow::ProofOfWork;
pub use transaction::Transaction;
