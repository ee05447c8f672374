//! Nullable infrastructure for deterministic testing.
//!
//! The election's outside world is a ledger it moves value through and the
//! listeners it notifies. This crate provides test-friendly stand-ins that:
//! - Record every interaction for later assertions
//! - Can be told to fail on demand
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod events;
pub mod ledger;

pub use events::EventRecorder;
pub use ledger::NullLedger;
