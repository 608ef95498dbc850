//! Builder API for ledger construction.
//!
//! The controller identity is the ledger's only construction-time setting;
//! the builder checks it is present and non-empty.
//!
//! # Example
//!
//! ```
//! use arena_ledger::builder::LedgerBuilder;
//! use arena_ledger::core::{Attributes, Identity};
//!
//! let mut ledger = LedgerBuilder::new().controller("admin").build().unwrap();
//! let admin = Identity::new("admin");
//! let id = ledger
//!     .mint(&admin, Identity::new("alice"), "ipfs://hero", Attributes::new(1, 2, 3))
//!     .unwrap();
//! assert_eq!(id.raw(), 1);
//! ```

pub mod error;
pub mod ledger;

pub use error::BuildError;
pub use ledger::LedgerBuilder;
