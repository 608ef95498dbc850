//! Input violations.

use crate::core::TokenId;
use thiserror::Error;

/// A single reason an operation's arguments were rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputViolation {
    #[error("recipient identity is empty")]
    EmptyRecipient,

    #[error("token {token} cannot battle itself")]
    SelfBattle { token: TokenId },

    #[error("{attribute} of token {token} would overflow")]
    AttributeOverflow {
        token: TokenId,
        attribute: &'static str,
    },

    #[error("experience of token {token} would overflow")]
    ExperienceOverflow { token: TokenId },

    #[error("no token ids left to issue")]
    IdSpaceExhausted,
}
