use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum TransactionType {
    /// A credit to the account, increasing its balance.
    /// Also used for the opening deposit when an account is created.
    Deposit,

    /// A debit to the account, decreasing its balance.
    /// The ledger rejects withdrawals that would leave the balance
    /// below the minimum-balance floor.
    Withdraw,

    /// The debit leg of a transfer, recorded against the source
    /// account. Its note names the destination account.
    TransferOut,

    /// The credit leg of a transfer, recorded against the destination
    /// account. Its note names the source account.
    TransferIn,
}

impl TransactionType {
    fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
            TransactionType::TransferOut => "TRANSFER_OUT",
            TransactionType::TransferIn => "TRANSFER_IN",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One balance-affecting event. Immutable once constructed; the ledger's
/// global log keeps every one of these in insertion order, and each account
/// keeps a bounded buffer of its most recent ones for mini statements.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Transaction {
    account_number: u32,

    #[serde(rename = "type")]
    tx_type: TransactionType,

    amount: Decimal,

    note: String,

    /// Local wall-clock time at creation. Stored zone-less, the way it
    /// is displayed.
    timestamp: NaiveDateTime,
}

impl Transaction {
    pub fn new(
        account_number: u32,
        tx_type: TransactionType,
        amount: Decimal,
        note: impl Into<String>,
    ) -> Self {
        Transaction {
            account_number,
            tx_type,
            amount,
            note: note.into(),
            timestamp: chrono::Local::now().naive_local(),
        }
    }

    pub fn account_number(&self) -> u32 {
        self.account_number
    }

    pub fn tx_type(&self) -> TransactionType {
        self.tx_type
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {:.2} | {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S"),
            self.tx_type,
            self.amount,
            self.note
        )
    }
}
