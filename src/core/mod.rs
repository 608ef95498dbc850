//! Core ledger types and logic.
//!
//! This module contains the pure functional core of the ledger:
//! - Token records and the fixed attribute triple
//! - Battle resolution from attributes alone
//! - Access guards for each operation
//! - The notification history
//!
//! Nothing here owns mutable ledger state; [`crate::ledger`] drives these
//! values through its transitions.

mod guard;
mod history;
mod token;

pub use guard::{AccessContext, AccessPolicy, Guard, Operation};
pub use history::{EventHistory, EventRecord, LedgerEvent};
pub use token::{Attributes, BattleOutcome, Identity, Token, TokenId};
