//! Voter secret ("sigil") used to open a commitment.

use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{decode_32, TypesError};

/// A 32-byte voter-chosen nonce.
///
/// Secret until the voter opens their envelope. Not `Copy` or `Serialize`;
/// `Debug` is redacted and the bytes are zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Sigil([u8; 32]);

impl Sigil {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Small integer sigils are encoded big-endian in the low 8 bytes.
impl From<u64> for Sigil {
    fn from(n: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }
}

/// Parses either a decimal integer or a 32-byte hex string.
impl FromStr for Sigil {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u64>() {
            Ok(n) => Ok(Self::from(n)),
            Err(_) => decode_32(s).map(Self),
        }
    }
}

impl fmt::Debug for Sigil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sigil(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_sigil_is_big_endian_in_low_bytes() {
        let sigil = Sigil::from(0x0102u64);
        let bytes = sigil.as_bytes();
        assert!(bytes[..30].iter().all(|b| *b == 0));
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
    }

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!("101".parse::<Sigil>().unwrap(), Sigil::from(101));
        let hex = "11".repeat(32);
        assert_eq!(hex.parse::<Sigil>().unwrap(), Sigil::new([0x11; 32]));
        assert!("not-a-sigil".parse::<Sigil>().is_err());
    }

    #[test]
    fn debug_does_not_leak() {
        let sigil = Sigil::new([0xee; 32]);
        assert!(!format!("{sigil:?}").contains("ee"));
    }
}
