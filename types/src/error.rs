//! Parse errors for the textual forms of the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("wrong length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Decode a hex string (optionally `0x`-prefixed) into a fixed 32-byte array.
pub(crate) fn decode_32(s: &str) -> Result<[u8; 32], TypesError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| TypesError::InvalidLength {
            expected: 32,
            got: bytes.len(),
        })
}
