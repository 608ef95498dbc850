//! Accumulating input validation for ledger operations.
//!
//! Rules are written against Stillwater's `Validation` type so that a
//! rejected call reports every problem with its arguments at once instead
//! of stopping at the first one.
//!
//! # Example
//!
//! ```rust
//! use arena_ledger::core::{Attributes, Identity, Token, TokenId};
//! use arena_ledger::validation::{check_upgrade, into_result, InputViolation};
//!
//! let token = Token::minted(
//!     TokenId(1),
//!     Identity::new("alice"),
//!     "ipfs://hero",
//!     Attributes::new(u64::MAX, 0, 0),
//! );
//!
//! let result = into_result(check_upgrade(&token, &Attributes::new(1, 0, 0)));
//! assert_eq!(
//!     result,
//!     Err(vec![InputViolation::AttributeOverflow {
//!         token: TokenId(1),
//!         attribute: "strength",
//!     }])
//! );
//! ```

pub mod rules;
pub mod violations;

pub use rules::{
    check_battle, check_battle_award, check_mint, check_upgrade, into_result, Checked, UpgradePlan,
};
pub use violations::InputViolation;
