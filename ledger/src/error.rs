use mayor_types::{AccountId, Amount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance in {account}: needed {needed}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: Amount,
        available: Amount,
    },

    #[error("transfer involves the null account")]
    NullAccount,

    #[error("balance overflow")]
    Overflow,

    #[error("transfer rejected: {reason}")]
    Rejected { reason: String },
}
