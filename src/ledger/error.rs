//! Ledger operation errors.

use crate::core::{Identity, Operation, TokenId};
use crate::validation::InputViolation;
use thiserror::Error;

/// Errors returned by ledger operations.
///
/// All of them are detected before any token is written, so a failed call
/// leaves the ledger exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller lacks the role or ownership the operation requires
    #[error("'{caller}' is not authorized to {operation}")]
    Unauthorized {
        caller: Identity,
        operation: Operation,
    },

    #[error("token {0} does not exist")]
    NotFound(TokenId),

    /// Malformed arguments. Lists every problem found.
    #[error("invalid input: {}", join(.violations))]
    InvalidInput { violations: Vec<InputViolation> },
}

impl LedgerError {
    /// True for `InvalidInput` containing `violation`.
    pub fn has_violation(&self, violation: &InputViolation) -> bool {
        match self {
            Self::InvalidInput { violations } => violations.contains(violation),
            _ => false,
        }
    }
}

impl From<Vec<InputViolation>> for LedgerError {
    fn from(violations: Vec<InputViolation>) -> Self {
        Self::InvalidInput { violations }
    }
}

fn join(violations: &[InputViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
