//! Cryptographic primitives for mayor elections.
//!
//! - **Blake2b-256** for hashing
//! - The ballot **commitment scheme** binding `(sigil, candidate, amount)`
//! - Sigil generation from the OS RNG and label-derived accounts for scripts

pub mod commitment;
pub mod hash;

pub use commitment::{
    account_from_label, compute_commitment, random_sigil, CryptoError, ENVELOPE_DOMAIN,
};
pub use hash::{blake2b_256, blake2b_256_multi};
