use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use super::crypto::ContentHash;

/// Sender used for mining rewards
pub const REWARD_SENDER: &str = "0";

/// Represents a transfer waiting in, or sealed into, the ledger
///
/// Transactions are content addressed: two transactions with the same fields
/// hash identically. The amount sign is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    /// Sender's address
    pub sender: String,

    /// Recipient's address
    pub recipient: String,

    /// Amount being transferred
    pub amount: i64,
}

impl Transaction {
    /// Creates a new transaction
    ///
    /// # Arguments
    ///
    /// * `sender` - The address of the sender
    /// * `recipient` - The address of the recipient
    /// * `amount` - The amount to transfer
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: i64) -> Self {
        Transaction {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// Creates a mining reward paid out to `recipient`
    pub fn reward(recipient: impl Into<String>, amount: i64) -> Self {
        Transaction::new(REWARD_SENDER, recipient, amount)
    }
}

impl ContentHash for Transaction {
    fn to_wire_format(&self) -> Value {
        json!({
            "sender": self.sender,
            "recipient": self.recipient,
            "amount": self.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::crypto::sha256_hex;

    #[test]
    fn test_new_transaction() {
        let transaction = Transaction::new("alice", "bob", 10);

        assert_eq!(transaction.sender, "alice");
        assert_eq!(transaction.recipient, "bob");
        assert_eq!(transaction.amount, 10);
    }

    #[test]
    fn test_reward_transaction() {
        let transaction = Transaction::reward("node", 1);

        assert_eq!(transaction.sender, "0");
        assert_eq!(transaction.recipient, "node");
        assert_eq!(transaction.amount, 1);
    }

    #[test]
    fn test_hash_covers_sorted_fields() {
        let transaction = Transaction::new("alice", "bob", 10);
        let expected = sha256_hex(br#"{"amount":10,"recipient":"bob","sender":"alice"}"#);

        assert_eq!(transaction.content_hash(), expected);
        assert_eq!(
            transaction.content_hash(),
            Transaction::new("alice", "bob", 10).content_hash()
        );
        assert_ne!(
            transaction.content_hash(),
            Transaction::new("alice", "bob", 11).content_hash()
        );
    }

    #[test]
    fn test_wire_format_matches_serde() {
        let transaction = Transaction::new("alice", "bob", -5);
        let serialized = serde_json::to_value(&transaction).unwrap();

        assert_eq!(serialized, transaction.to_wire_format());
    }
}
