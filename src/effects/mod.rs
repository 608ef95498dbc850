//! Effectful notification delivery using Stillwater 0.11.0.
//!
//! The ledger only records notifications. Handing them to external
//! observers is the imperative shell's job and lives here, as effects that
//! run against an environment implementing [`EventSink`].
//!
//! A failed dispatch never changes token state. The ledger only moves its
//! delivery cursor over records an observer actually accepted, so delivery
//! is at-least-once.

mod dispatch;

pub use dispatch::{dispatch, publish_pending, DispatchError, DispatchReport, EventSink};
