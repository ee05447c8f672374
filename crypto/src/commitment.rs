//! The sealed-ballot commitment scheme.
//!
//! A commitment is `Blake2b-256(ENVELOPE_DOMAIN || sigil || candidate || amount)`
//! where the sigil and candidate are 32 bytes each and the amount is encoded
//! as 16 big-endian bytes. Every field is fixed width, so no two distinct
//! inputs share an encoding.

use mayor_types::{AccountId, Amount, Commitment, Sigil};

use crate::hash::blake2b_256_multi;

/// Domain separation tag for ballot envelopes.
pub const ENVELOPE_DOMAIN: &[u8] = b"mayor/envelope/v1";

const ACCOUNT_LABEL_DOMAIN: &[u8] = b"mayor/account-label/v1";

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("OS random source unavailable: {0}")]
    Entropy(String),
}

/// Compute the commitment a voter submits when casting and the election
/// re-derives when the ballot is opened.
pub fn compute_commitment(sigil: &Sigil, candidate: &AccountId, amount: Amount) -> Commitment {
    let amount_bytes = amount.raw().to_be_bytes();
    Commitment::new(blake2b_256_multi(&[
        ENVELOPE_DOMAIN,
        sigil.as_bytes(),
        candidate.as_bytes(),
        &amount_bytes,
    ]))
}

/// Draw a fresh 32-byte sigil from the operating system RNG.
pub fn random_sigil() -> Result<Sigil, CryptoError> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::Entropy(e.to_string()))?;
    Ok(Sigil::new(bytes))
}

/// Derive a deterministic account id from a human-readable label.
///
/// Used by scenario scripts and tests so that `"alice"` always maps to the
/// same account. The result is never the null account in practice.
pub fn account_from_label(label: &str) -> AccountId {
    AccountId::new(blake2b_256_multi(&[ACCOUNT_LABEL_DOMAIN, label.as_bytes()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> AccountId {
        account_from_label("candidate1")
    }

    #[test]
    fn commitment_is_deterministic() {
        let a = compute_commitment(&Sigil::from(101), &candidate(), Amount::new(26));
        let b = compute_commitment(&Sigil::from(101), &candidate(), Amount::new(26));
        assert_eq!(a, b);
    }

    #[test]
    fn every_field_changes_the_commitment() {
        let base = compute_commitment(&Sigil::from(101), &candidate(), Amount::new(26));
        assert_ne!(
            base,
            compute_commitment(&Sigil::from(102), &candidate(), Amount::new(26))
        );
        assert_ne!(
            base,
            compute_commitment(&Sigil::from(101), &account_from_label("candidate2"), Amount::new(26))
        );
        assert_ne!(
            base,
            compute_commitment(&Sigil::from(101), &candidate(), Amount::new(25))
        );
    }

    #[test]
    fn commitment_matches_manual_encoding() {
        let sigil = Sigil::from(7);
        let cand = candidate();
        let mut buf = Vec::new();
        buf.extend_from_slice(ENVELOPE_DOMAIN);
        buf.extend_from_slice(sigil.as_bytes());
        buf.extend_from_slice(cand.as_bytes());
        buf.extend_from_slice(&50u128.to_be_bytes());
        assert_eq!(
            compute_commitment(&sigil, &cand, Amount::new(50)).as_bytes(),
            &crate::hash::blake2b_256(&buf)
        );
    }

    #[test]
    fn labels_map_to_distinct_non_null_accounts() {
        let alice = account_from_label("alice");
        assert_eq!(alice, account_from_label("alice"));
        assert_ne!(alice, account_from_label("bob"));
        assert!(!alice.is_null());
    }

    #[test]
    fn random_sigils_differ() {
        let a = random_sigil().unwrap();
        let b = random_sigil().unwrap();
        assert_ne!(a, b);
    }
}
