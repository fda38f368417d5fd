use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Why a ledger operation was refused. Every variant is raised before
/// any state is mutated, so a failed operation leaves the ledger exactly
/// as it was.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LedgerError {
    /// Malformed or out-of-policy input: a non-positive amount, a
    /// self-transfer, or an opening deposit below the minimum balance.
    #[error("{0}")]
    Validation(String),

    /// Account-opening identity fields fail the minimum-length policy.
    #[error("{0}")]
    Kyc(String),

    /// The referenced account number does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(u32),

    /// The operation would leave the account below the minimum balance.
    #[error("Acc:{account} balance {balance:.2} cannot cover {requested:.2} without breaching the minimum balance")]
    InsufficientBalance {
        account: u32,
        requested: Decimal,
        balance: Decimal,
    },
}
