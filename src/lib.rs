//! Arena Ledger: a ledger of owned character tokens
//!
//! Arena Ledger follows a "pure core, imperative shell" layout. Token values,
//! battle resolution, access guards and input validation are pure functions;
//! the ledger owns the mutable state, and notification delivery is an effect
//! run at the edge.
//!
//! # Core Concepts
//!
//! - **Token**: an owned character with strength, agility, intelligence and experience
//! - **Mint**: the controller creates a token for any owner
//! - **Upgrade**: the owner permanently raises attributes, earning experience
//! - **Battle**: any caller pits two tokens; the stronger one gains a point of experience
//!
//! # Example
//!
//! ```rust
//! use arena_ledger::{Attributes, BattleOutcome, Identity, LedgerBuilder};
//!
//! let admin = Identity::new("admin");
//! let player = Identity::new("player");
//! let mut ledger = LedgerBuilder::new().controller(admin.clone()).build().unwrap();
//!
//! let a = ledger
//!     .mint(&admin, player.clone(), "ipfs://a", Attributes::new(10, 10, 10))
//!     .unwrap();
//! let b = ledger
//!     .mint(&admin, player.clone(), "ipfs://b", Attributes::new(15, 5, 10))
//!     .unwrap();
//!
//! assert_eq!(ledger.battle(&player, a, b).unwrap(), BattleOutcome::Tie);
//! assert_eq!(ledger.experience(a).unwrap(), 0);
//! assert_eq!(ledger.experience(b).unwrap(), 0);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod effects;
pub mod ledger;
pub mod validation;

// Re-export commonly used types
pub use builder::{BuildError, LedgerBuilder};
pub use checkpoint::{CheckpointError, LedgerCheckpoint};
pub use config::{ConfigError, LedgerConfig};
pub use crate::core::{
    Attributes, BattleOutcome, EventRecord, Identity, LedgerEvent, Token, TokenId,
};
pub use ledger::{LedgerError, SharedLedger, TokenLedger};
