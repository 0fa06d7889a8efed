use log::{debug, info, warn};
use thiserror::Error;

use super::block::{Block, PreviousHash};
use super::crypto::ContentHash;
use super::pow::ProofOfWork;
use super::transaction::Transaction;

/// Difficulty used when none is configured
pub const DEFAULT_DIFFICULTY: usize = 4;

/// Errors that can occur during ledger operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Can't find previous block in the chain, the genesis block is missing")]
    EmptyChain,

    #[error("Invalid proof {proof} for previous proof {previous_proof} at difficulty {difficulty}")]
    InvalidProof {
        previous_proof: u64,
        proof: u64,
        difficulty: usize,
    },

    #[error("Invalid difficulty: {0} (must not be negative)")]
    InvalidDifficulty(i64),

    #[error("Invalid chain: {0}")]
    InvalidChain(String),
}

/// Single-node proof-of-work ledger
///
/// Owns the chain and the pending pool. It has no internal locking; callers
/// sharing one ledger must serialize access themselves.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// The chain of blocks, genesis first
    chain: Vec<Block>,

    /// Transactions to be sealed into the next block
    pending_transactions: Vec<Transaction>,

    /// Number of leading zero hex digits a proof digest needs
    difficulty: usize,

    /// Difficulty each block was sealed at, parallel to `chain`
    sealed_at: Vec<usize>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Creates a new ledger with a genesis block and the default difficulty
    pub fn new() -> Self {
        Self::with_difficulty(DEFAULT_DIFFICULTY)
    }

    /// Creates a new ledger with a genesis block and the given difficulty
    pub fn with_difficulty(difficulty: usize) -> Self {
        Ledger {
            chain: vec![Block::genesis()],
            pending_transactions: Vec::new(),
            difficulty,
            sealed_at: vec![0],
        }
    }

    /// Gets the last block in the chain
    ///
    /// An empty chain means the genesis block is missing, which construction
    /// rules out; treat [`LedgerError::EmptyChain`] as fatal.
    pub fn tail(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Current difficulty
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Replaces the difficulty used for all future seals
    pub fn set_difficulty(&mut self, new_difficulty: i64) -> Result<(), LedgerError> {
        let difficulty = usize::try_from(new_difficulty).map_err(|_| {
            warn!("Rejected negative difficulty {}", new_difficulty);
            LedgerError::InvalidDifficulty(new_difficulty)
        })?;

        info!("Proof difficulty changed from {} to {}", self.difficulty, difficulty);
        self.difficulty = difficulty;
        Ok(())
    }

    /// The blocks in the chain, genesis first
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Transactions waiting for the next seal, in arrival order
    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending_transactions
    }

    /// Queues a transaction for the next block
    ///
    /// # Returns
    ///
    /// The current chain length, which is the index reported for the block
    /// that will hold this transaction
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: i64,
    ) -> u64 {
        self.add_pending(Transaction::new(sender, recipient, amount))
    }

    /// Queues an already built transaction, see [`Ledger::add_transaction`]
    pub fn add_pending(&mut self, transaction: Transaction) -> u64 {
        debug!(
            "Queued transaction {} -> {} ({})",
            transaction.sender, transaction.recipient, transaction.amount
        );
        self.pending_transactions.push(transaction);

        self.chain.len() as u64
    }

    /// Seals the pending pool into a new block
    ///
    /// # Arguments
    ///
    /// * `proof` - A proof that validates against the tail's proof
    /// * `previous_hash` - Hash to link to; the tail's hash when `None` or empty
    ///
    /// # Returns
    ///
    /// The appended block. On error nothing changes.
    pub fn seal_block(
        &mut self,
        proof: u64,
        previous_hash: Option<String>,
    ) -> Result<&Block, LedgerError> {
        let tail = self.tail()?;

        if !ProofOfWork::validate(tail.proof, proof, self.difficulty) {
            warn!(
                "Rejected proof {} for previous proof {} at difficulty {}",
                proof, tail.proof, self.difficulty
            );
            return Err(LedgerError::InvalidProof {
                previous_proof: tail.proof,
                proof,
                difficulty: self.difficulty,
            });
        }

        let previous_hash = previous_hash
            .filter(|hash| !hash.is_empty())
            .unwrap_or_else(|| tail.content_hash());
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending_transactions);

        let block = Block::new(index, transactions, proof, PreviousHash::Digest(previous_hash));
        info!(
            "Sealed block {} with {} transactions (proof {})",
            block.index,
            block.transactions.len(),
            block.proof
        );

        self.chain.push(block);
        self.sealed_at.push(self.difficulty);
        self.tail()
    }

    /// Re-validates the whole chain from genesis
    ///
    /// Checks every link hash, the index numbering and every proof against the
    /// difficulty in force when its block was sealed.
    pub fn verify_chain(&self) -> Result<(), LedgerError> {
        let genesis = self.chain.first().ok_or(LedgerError::EmptyChain)?;
        if genesis.index != 0 {
            return Err(LedgerError::InvalidChain(format!(
                "genesis block has index {}",
                genesis.index
            )));
        }

        for (position, pair) in self.chain.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let position = position + 1;

            let expected_index = position as u64 + 1;
            if current.index != expected_index {
                return Err(LedgerError::InvalidChain(format!(
                    "block at position {} has index {}, expected {}",
                    position, current.index, expected_index
                )));
            }

            let expected_hash = PreviousHash::Digest(previous.content_hash());
            if current.previous_hash != expected_hash {
                return Err(LedgerError::InvalidChain(format!(
                    "block {} does not link to the hash of block {}",
                    current.index, previous.index
                )));
            }

            let difficulty = self.sealed_at.get(position).copied().unwrap_or(self.difficulty);
            if !ProofOfWork::validate(previous.proof, current.proof, difficulty) {
                return Err(LedgerError::InvalidChain(format!(
                    "block {} has proof {} which fails difficulty {}",
                    current.index, current.proof, difficulty
                )));
            }
        }

        Ok(())
    }
}
