//! Fundamental types for the mayor sealed-ballot election.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: account identities, amounts, ballot commitments and the voter
//! secrets that open them.

pub mod account;
pub mod amount;
pub mod commitment;
pub mod error;
pub mod sigil;

pub use account::AccountId;
pub use amount::Amount;
pub use commitment::Commitment;
pub use error::TypesError;
pub use sigil::Sigil;
