//! Thread-safe handle to a ledger.

use crate::core::{Attributes, BattleOutcome, EventRecord, Identity, TokenId};
use crate::ledger::error::LedgerError;
use crate::ledger::token_ledger::TokenLedger;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A cloneable handle that serializes every operation on one ledger.
///
/// Each call holds the lock for the whole operation, so every call observes
/// all previously completed calls and never a partially applied one.
///
/// A poisoned lock is recovered: operations validate before writing, so a
/// panic elsewhere cannot leave a half-applied transition behind.
#[derive(Clone, Debug)]
pub struct SharedLedger {
    inner: Arc<Mutex<TokenLedger>>,
}

impl SharedLedger {
    pub fn new(ledger: TokenLedger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn mint(
        &self,
        caller: &Identity,
        to: Identity,
        metadata_ref: impl Into<String>,
        attributes: Attributes,
    ) -> Result<TokenId, LedgerError> {
        self.lock().mint(caller, to, metadata_ref, attributes)
    }

    pub fn upgrade(
        &self,
        caller: &Identity,
        id: TokenId,
        delta: Attributes,
    ) -> Result<(), LedgerError> {
        self.lock().upgrade(caller, id, delta)
    }

    pub fn battle(
        &self,
        caller: &Identity,
        challenger: TokenId,
        defender: TokenId,
    ) -> Result<BattleOutcome, LedgerError> {
        self.lock().battle(caller, challenger, defender)
    }

    pub fn attributes(&self, id: TokenId) -> Result<Attributes, LedgerError> {
        self.lock().attributes(id)
    }

    pub fn experience(&self, id: TokenId) -> Result<u64, LedgerError> {
        self.lock().experience(id)
    }

    pub fn owner(&self, id: TokenId) -> Result<Identity, LedgerError> {
        self.lock().owner(id).cloned()
    }

    pub fn last_issued_id(&self) -> u64 {
        self.lock().last_issued_id()
    }

    pub fn drain_notifications(&self) -> Vec<EventRecord> {
        self.lock().drain_notifications()
    }

    /// Pending notifications, copied out so the lock is not held during delivery.
    pub fn pending_notifications(&self) -> Vec<EventRecord> {
        self.lock().pending_notifications().to_vec()
    }

    pub fn acknowledge(&self, accepted: &[u64]) -> usize {
        self.lock().acknowledge(accepted)
    }

    pub fn compact_history(&self) -> usize {
        self.lock().compact_history()
    }

    /// Run `f` against a consistent view of the ledger.
    pub fn read<R>(&self, f: impl FnOnce(&TokenLedger) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, TokenLedger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<TokenLedger> for SharedLedger {
    fn from(ledger: TokenLedger) -> Self {
        Self::new(ledger)
    }
}
