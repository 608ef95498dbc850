//! Builder for constructing ledgers.

use crate::builder::error::BuildError;
use crate::config::LedgerConfig;
use crate::core::Identity;
use crate::ledger::{SharedLedger, TokenLedger};

/// Builder for constructing ledgers with a fluent API.
#[derive(Debug, Default)]
pub struct LedgerBuilder {
    controller: Option<Identity>,
}

impl LedgerBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self { controller: None }
    }

    /// Start from loaded configuration.
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new().controller(config.controller.as_str())
    }

    /// Set the identity allowed to mint (required).
    pub fn controller(mut self, controller: impl Into<Identity>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    /// Build the ledger.
    /// Returns an error if the controller is missing or empty.
    pub fn build(self) -> Result<TokenLedger, BuildError> {
        let controller = self.controller.ok_or(BuildError::MissingController)?;

        if controller.is_empty() {
            return Err(BuildError::EmptyController);
        }

        tracing::debug!(%controller, "ledger created");
        Ok(TokenLedger::new(controller))
    }

    /// Build the ledger behind a thread-safe handle.
    pub fn build_shared(self) -> Result<SharedLedger, BuildError> {
        self.build().map(SharedLedger::new)
    }
}
