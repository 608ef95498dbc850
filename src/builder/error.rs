//! Build errors for the ledger builder.

use thiserror::Error;

/// Errors that can occur when building a ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Controller not specified. Call .controller(identity) before .build()")]
    MissingController,

    #[error("Controller identity is empty")]
    EmptyController,
}
