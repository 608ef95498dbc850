//! Reasons a ledger checkpoint cannot be written or restored.

use crate::core::TokenId;
use thiserror::Error;

/// Errors from encoding, decoding or validating a [`LedgerCheckpoint`].
///
/// [`LedgerCheckpoint`]: super::LedgerCheckpoint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckpointError {
    /// JSON or binary encoding failed
    #[error("Could not encode checkpoint: {0}")]
    Encode(String),

    /// The input is not a readable checkpoint
    #[error("Could not decode checkpoint: {0}")]
    Decode(String),

    #[error("Checkpoint format {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Checkpoint has no controller")]
    EmptyController,

    /// A token id of zero or above the issued counter
    #[error("Token {token} lies outside the issued range 1..={last_issued}")]
    OutOfRange { token: TokenId, last_issued: u64 },

    #[error("Token {0} appears more than once")]
    DuplicateToken(TokenId),

    /// Tokens are never burned, so every issued id must be present
    #[error("Token {0} was issued but is missing")]
    MissingToken(TokenId),

    #[error("Token {0} has no owner")]
    OwnerlessToken(TokenId),

    /// Notification sequence numbers skip or repeat at `expected`
    #[error("History breaks at sequence {expected}")]
    BrokenHistory { expected: u64 },
}
