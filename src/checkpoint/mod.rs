//! Snapshot and restore for ledgers.
//!
//! A checkpoint captures every token, the id counter and the notification
//! history, so a ledger can survive a process restart. Restored data is
//! validated against the ledger invariants before a ledger is rebuilt.

use crate::core::{EventHistory, Identity, Token, TokenId};
use crate::ledger::TokenLedger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerCheckpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub controller: Identity,

    pub last_issued_id: u64,

    /// Tokens in ascending id order
    pub tokens: Vec<Token>,

    pub history: EventHistory,
}

impl LedgerCheckpoint {
    /// Capture the current state of `ledger`.
    pub fn capture(ledger: &TokenLedger) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            controller: ledger.controller().clone(),
            last_issued_id: ledger.last_issued_id(),
            tokens: ledger.tokens().cloned().collect(),
            history: ledger.history().clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json).map_err(|e| CheckpointError::Decode(e.to_string()))
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::Decode(e.to_string()))
    }

    /// Check the snapshot against the ledger invariants.
    ///
    /// Ids `1..=last_issued_id` must each appear exactly once, since tokens
    /// are never deleted, and every owner must be non-empty. History may have
    /// been compacted but its sequence numbers must not skip.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        if self.controller.is_empty() {
            return Err(CheckpointError::EmptyController);
        }

        let mut seen = BTreeSet::new();
        for token in &self.tokens {
            if token.id.raw() == 0 || token.id.raw() > self.last_issued_id {
                return Err(CheckpointError::OutOfRange {
                    token: token.id,
                    last_issued: self.last_issued_id,
                });
            }
            if !seen.insert(token.id) {
                return Err(CheckpointError::DuplicateToken(token.id));
            }
            if token.owner.is_empty() {
                return Err(CheckpointError::OwnerlessToken(token.id));
            }
        }

        // Every id is in range and unique, so a short count means a gap.
        if (seen.len() as u64) < self.last_issued_id {
            if let Some(id) = (1..=self.last_issued_id)
                .map(TokenId)
                .find(|id| !seen.contains(id))
            {
                return Err(CheckpointError::MissingToken(id));
            }
        }

        if let Some(expected) = self.history.first_gap() {
            return Err(CheckpointError::BrokenHistory { expected });
        }

        Ok(())
    }

    /// Validate and rebuild the ledger.
    ///
    /// Notifications recorded before the checkpoint count as delivered.
    pub fn restore(self) -> Result<TokenLedger, CheckpointError> {
        self.validate()?;
        tracing::info!(
            checkpoint = %self.id,
            tokens = self.tokens.len(),
            last_issued_id = self.last_issued_id,
            "restoring ledger from checkpoint"
        );
        Ok(TokenLedger::from_parts(
            self.controller,
            self.tokens,
            self.last_issued_id,
            self.history,
        ))
    }
}

impl TokenLedger {
    /// Snapshot this ledger.
    pub fn checkpoint(&self) -> LedgerCheckpoint {
        LedgerCheckpoint::capture(self)
    }

    /// Rebuild a ledger from a checkpoint.
    pub fn resume(checkpoint: LedgerCheckpoint) -> Result<Self, CheckpointError> {
        checkpoint.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Attributes;

    fn sample_ledger() -> TokenLedger {
        let admin = Identity::new("admin");
        let alice = Identity::new("alice");
        let mut ledger = TokenLedger::new(admin.clone());
        let a = ledger
            .mint(&admin, alice.clone(), "ipfs://a", Attributes::new(10, 15, 20))
            .unwrap();
        let b = ledger
            .mint(&admin, alice.clone(), "ipfs://b", Attributes::new(5, 10, 15))
            .unwrap();
        ledger.upgrade(&alice, b, Attributes::new(1, 2, 3)).unwrap();
        ledger.battle(&alice, a, b).unwrap();
        ledger
    }

    #[test]
    fn capture_records_ledger_state() {
        let ledger = sample_ledger();
        let checkpoint = ledger.checkpoint();

        assert_eq!(checkpoint.version, CHECKPOINT_VERSION);
        assert_eq!(checkpoint.last_issued_id, 2);
        assert_eq!(checkpoint.tokens.len(), 2);
        assert_eq!(checkpoint.history.len(), 4);
        assert!(Uuid::parse_str(&checkpoint.id).is_ok());
    }

    #[test]
    fn json_roundtrip_restores_ledger() {
        let ledger = sample_ledger();
        let json = ledger.checkpoint().to_json().unwrap();

        let restored = TokenLedger::resume(LedgerCheckpoint::from_json(&json).unwrap()).unwrap();

        assert_eq!(restored.last_issued_id(), 2);
        assert_eq!(
            restored.tokens().collect::<Vec<_>>(),
            ledger.tokens().collect::<Vec<_>>()
        );
        assert_eq!(restored.history(), ledger.history());
    }

    #[test]
    fn binary_roundtrip_restores_ledger() {
        let ledger = sample_ledger();
        let bytes = ledger.checkpoint().to_binary().unwrap();

        let restored = LedgerCheckpoint::from_binary(&bytes).unwrap().restore().unwrap();

        assert_eq!(restored.experience(TokenId(1)).unwrap(), 1);
        assert_eq!(restored.experience(TokenId(2)).unwrap(), 6);
        assert_eq!(restored.controller(), &Identity::new("admin"));
    }

    #[test]
    fn restored_ledger_continues_id_sequence() {
        let mut restored = sample_ledger().checkpoint().restore().unwrap();
        let admin = Identity::new("admin");

        let id = restored
            .mint(&admin, Identity::new("bob"), "ipfs://c", Attributes::default())
            .unwrap();
        assert_eq!(id, TokenId(3));
    }

    #[test]
    fn restored_ledger_has_nothing_pending() {
        let restored = sample_ledger().checkpoint().restore().unwrap();
        assert!(restored.pending_notifications().is_empty());
        assert_eq!(restored.history().len(), 4);
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut checkpoint = sample_ledger().checkpoint();
        checkpoint.version = 99;

        let err = checkpoint.restore().unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::UnsupportedVersion {
                found: 99,
                supported: CHECKPOINT_VERSION
            }
        ));
    }

    #[test]
    fn rejects_token_beyond_counter() {
        let mut checkpoint = sample_ledger().checkpoint();
        checkpoint.last_issued_id = 1;

        assert_eq!(
            checkpoint.validate(),
            Err(CheckpointError::OutOfRange {
                token: TokenId(2),
                last_issued: 1,
            })
        );
    }

    #[test]
    fn rejects_missing_token() {
        let mut checkpoint = sample_ledger().checkpoint();
        checkpoint.tokens.remove(0);

        let err = checkpoint.validate().unwrap_err();
        assert_eq!(err, CheckpointError::MissingToken(TokenId(1)));
        assert_eq!(err.to_string(), "Token #1 was issued but is missing");
    }

    #[test]
    fn rejects_duplicate_token() {
        let mut checkpoint = sample_ledger().checkpoint();
        let duplicate = checkpoint.tokens[1].clone();
        checkpoint.tokens[0] = duplicate;

        assert_eq!(
            checkpoint.validate(),
            Err(CheckpointError::DuplicateToken(TokenId(2)))
        );
    }

    #[test]
    fn rejects_ownerless_token() {
        let mut checkpoint = sample_ledger().checkpoint();
        checkpoint.tokens[0].owner = Identity::new("");

        assert_eq!(
            checkpoint.validate(),
            Err(CheckpointError::OwnerlessToken(TokenId(1)))
        );
    }

    #[test]
    fn rejects_empty_controller() {
        let mut checkpoint = sample_ledger().checkpoint();
        checkpoint.controller = Identity::new("  ");

        assert_eq!(checkpoint.validate(), Err(CheckpointError::EmptyController));
    }

    #[test]
    fn rejects_broken_history() {
        let json = sample_ledger().checkpoint().to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["history"]["records"][2]["sequence"] = serde_json::json!(7);

        let checkpoint = LedgerCheckpoint::from_json(&value.to_string()).unwrap();

        assert_eq!(
            checkpoint.validate(),
            Err(CheckpointError::BrokenHistory { expected: 2 })
        );
    }

    #[test]
    fn compacted_history_roundtrips() {
        let mut ledger = sample_ledger();
        ledger.acknowledge(&[0, 1]);
        ledger.compact_history();

        let json = ledger.checkpoint().to_json().unwrap();
        let mut restored = LedgerCheckpoint::from_json(&json).unwrap().restore().unwrap();

        assert_eq!(restored.history().first_sequence(), 2);
        assert_eq!(restored.history(), ledger.history());
        assert!(restored.pending_notifications().is_empty());

        let admin = Identity::new("admin");
        restored
            .mint(&admin, Identity::new("bob"), "ipfs://c", Attributes::default())
            .unwrap();
        assert_eq!(restored.pending_notifications()[0].sequence, 4);
    }

    #[test]
    fn rejects_corrupt_json() {
        let err = LedgerCheckpoint::from_json("{\"version\": 1").unwrap_err();
        assert!(matches!(err, CheckpointError::Decode(_)));
    }

    #[test]
    fn rejects_truncated_binary() {
        let bytes = sample_ledger().checkpoint().to_binary().unwrap();
        let err = LedgerCheckpoint::from_binary(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, CheckpointError::Decode(_)));
    }
}
