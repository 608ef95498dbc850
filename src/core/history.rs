//! Notification history.
//!
//! Every successful ledger transition produces one [`LedgerEvent`]. Events
//! are stamped with a sequence number and a timestamp and appended to an
//! ordered [`EventHistory`] that downstream indexers can consume.

use super::token::{Attributes, BattleOutcome, Identity, TokenId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A notification emitted by a completed ledger operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Minted {
        token: TokenId,
        owner: Identity,
        attributes: Attributes,
        metadata_ref: String,
    },
    Upgraded {
        token: TokenId,
        owner: Identity,
        before: Attributes,
        after: Attributes,
        experience: u64,
    },
    BattleResolved {
        caller: Identity,
        challenger: TokenId,
        defender: TokenId,
        challenger_power: u128,
        defender_power: u128,
        outcome: BattleOutcome,
    },
}

impl LedgerEvent {
    /// Name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Minted { .. } => "Minted",
            Self::Upgraded { .. } => "Upgraded",
            Self::BattleResolved { .. } => "BattleResolved",
        }
    }

    /// True if the event concerns `id`.
    pub fn involves(&self, id: TokenId) -> bool {
        match self {
            Self::Minted { token, .. } | Self::Upgraded { token, .. } => *token == id,
            Self::BattleResolved {
                challenger,
                defender,
                ..
            } => *challenger == id || *defender == id,
        }
    }
}

/// A stamped event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the ledger's history, starting at 0.
    pub sequence: u64,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
    pub event: LedgerEvent,
}

/// Ordered log of ledger events.
///
/// # Example
///
/// ```rust
/// use arena_ledger::core::{Attributes, EventHistory, Identity, LedgerEvent, TokenId};
///
/// let history = EventHistory::new().record(LedgerEvent::Minted {
///     token: TokenId(1),
///     owner: Identity::new("alice"),
///     attributes: Attributes::new(1, 2, 3),
///     metadata_ref: "ipfs://hero".to_string(),
/// });
///
/// assert_eq!(history.len(), 1);
/// assert_eq!(history.records()[0].sequence, 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHistory {
    /// Sequence number of `records[0]`; non-zero once compacted.
    #[serde(default)]
    first_sequence: u64,
    records: Vec<EventRecord>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self {
            first_sequence: 0,
            records: Vec::new(),
        }
    }

    /// Stamp `event` with the next sequence number and the current time,
    /// returning the extended history.
    pub fn record(self, event: LedgerEvent) -> Self {
        self.record_at(event, Utc::now())
    }

    /// Like [`record`](Self::record) with an explicit timestamp.
    pub fn record_at(mut self, event: LedgerEvent, timestamp: DateTime<Utc>) -> Self {
        let sequence = self.next_sequence();
        self.records.push(EventRecord {
            sequence,
            timestamp,
            event,
        });
        self
    }

    /// All records in the order they happened.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with a sequence number of at least `sequence`.
    pub fn since(&self, sequence: u64) -> &[EventRecord] {
        let start = sequence.saturating_sub(self.first_sequence);
        usize::try_from(start)
            .ok()
            .and_then(|start| self.records.get(start..))
            .unwrap_or(&[])
    }

    /// Sequence number the next recorded event will receive.
    pub fn next_sequence(&self) -> u64 {
        self.first_sequence + self.records.len() as u64
    }

    /// Sequence number of the oldest retained record.
    pub fn first_sequence(&self) -> u64 {
        self.first_sequence
    }

    /// Drop every record older than `sequence`, returning how many went.
    pub fn discard_before(&mut self, sequence: u64) -> usize {
        let count = self
            .records
            .iter()
            .take_while(|record| record.sequence < sequence)
            .count();
        self.records.drain(..count);
        self.first_sequence += count as u64;
        count
    }

    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record that concerns `id`, oldest first.
    pub fn for_token(&self, id: TokenId) -> Vec<&EventRecord> {
        self.records
            .iter()
            .filter(|record| record.event.involves(id))
            .collect()
    }

    /// Time between the first and last record, or `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// The sequence number expected where the records first skip or repeat
    /// one, or `None` if they are contiguous from the first retained record.
    pub(crate) fn first_gap(&self) -> Option<u64> {
        self.records
            .iter()
            .zip(self.first_sequence..)
            .find(|(record, expected)| record.sequence != *expected)
            .map(|(_, expected)| expected)
    }
}
