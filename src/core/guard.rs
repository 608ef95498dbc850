//! Access guards for ledger operations.
//!
//! Guards are pure boolean functions over an [`AccessContext`]. Each ledger
//! operation is gated by exactly one guard, collected in an [`AccessPolicy`].

use super::token::Identity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three mutating operations a ledger exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Mint,
    Upgrade,
    Battle,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::Upgrade => "upgrade",
            Self::Battle => "battle",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a guard may inspect when deciding whether a caller may proceed.
#[derive(Clone, Copy, Debug)]
pub struct AccessContext<'a> {
    /// The authenticated identity invoking the operation.
    pub caller: &'a Identity,
    /// The ledger's controller, fixed at construction.
    pub controller: &'a Identity,
    /// Owner of the token being acted on, when there is a single one.
    pub owner: Option<&'a Identity>,
}

/// Pure predicate that decides whether a caller may run an operation.
///
/// # Example
///
/// ```rust
/// use arena_ledger::core::{AccessContext, Guard, Identity};
///
/// let controller = Identity::new("admin");
/// let player = Identity::new("player");
///
/// let guard = Guard::controller_only();
/// assert!(guard.check(&AccessContext {
///     caller: &controller,
///     controller: &controller,
///     owner: None,
/// }));
/// assert!(!guard.check(&AccessContext {
///     caller: &player,
///     controller: &controller,
///     owner: None,
/// }));
/// ```
pub struct Guard {
    label: &'static str,
    predicate: Box<dyn Fn(&AccessContext<'_>) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(label: &'static str, predicate: F) -> Self
    where
        F: Fn(&AccessContext<'_>) -> bool + Send + Sync + 'static,
    {
        Guard {
            label,
            predicate: Box::new(predicate),
        }
    }

    /// Only the ledger controller passes.
    pub fn controller_only() -> Self {
        Self::new("controller-only", |ctx| ctx.caller == ctx.controller)
    }

    /// Only the current owner of the target token passes.
    ///
    /// Fails closed when the context carries no owner.
    pub fn owner_only() -> Self {
        Self::new("owner-only", |ctx| ctx.owner == Some(ctx.caller))
    }

    /// Every authenticated caller passes.
    pub fn open() -> Self {
        Self::new("open", |_| true)
    }

    /// Check whether the guard admits this context.
    pub fn check(&self, ctx: &AccessContext<'_>) -> bool {
        (self.predicate)(ctx)
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("label", &self.label).finish()
    }
}

/// The guard assigned to each operation.
///
/// Minting is reserved to the controller and upgrading to the token's owner.
/// Battles are open: any caller may pit any two tokens against each other,
/// whoever owns them.
#[derive(Debug)]
pub struct AccessPolicy {
    mint: Guard,
    upgrade: Guard,
    battle: Guard,
}

impl AccessPolicy {
    pub fn guard(&self, operation: Operation) -> &Guard {
        match operation {
            Operation::Mint => &self.mint,
            Operation::Upgrade => &self.upgrade,
            Operation::Battle => &self.battle,
        }
    }

    pub fn permits(&self, operation: Operation, ctx: &AccessContext<'_>) -> bool {
        self.guard(operation).check(ctx)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            mint: Guard::controller_only(),
            upgrade: Guard::owner_only(),
            battle: Guard::open(),
        }
    }
}
