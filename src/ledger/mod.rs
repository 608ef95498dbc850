//! The stateful ledger.
//!
//! This module is the imperative shell around [`crate::core`]: it owns the
//! token records and the id counter, and drives mint, upgrade and battle
//! as atomic transitions.
//!
//! - [`TokenLedger`]: single-owner ledger, `&mut self` operations
//! - [`SharedLedger`]: `Arc<Mutex<_>>` handle for multi-threaded hosts
//! - [`LedgerError`]: `Unauthorized`, `NotFound`, `InvalidInput`

mod error;
mod shared;
mod token_ledger;

pub use error::LedgerError;
pub use shared::SharedLedger;
pub use token_ledger::TokenLedger;
