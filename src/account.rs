use std::collections::VecDeque;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// How many transactions an account buffers for mini statements.
/// The ledger's global log remains the full history.
pub const RECENT_LIMIT: usize = 100;

/// A single holder's balance plus a bounded most-recent-first transaction
/// buffer. The buffer is a derived cache: it is not persisted, and the
/// ledger rebuilds it from the global log after loading saved state.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Account {
    account_number: u32,

    holder_name: String,

    /// KYC identity captured at creation. Never changes afterwards.
    government_id: String,

    balance: Decimal,

    #[serde(skip)]
    recent: VecDeque<Transaction>,
}

impl Account {
    pub fn new(
        account_number: u32,
        holder_name: impl Into<String>,
        government_id: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Account {
            account_number,
            holder_name: holder_name.into(),
            government_id: government_id.into(),
            balance,
            recent: VecDeque::new(),
        }
    }

    pub fn account_number(&self) -> u32 {
        self.account_number
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn government_id(&self) -> &str {
        &self.government_id
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Adds to the balance. The ledger validates the amount before
    /// calling this; there is no failure path here.
    pub fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Subtracts from the balance. The ledger has already checked the
    /// minimum-balance rule; there is no failure path here.
    pub fn debit(&mut self, amount: Decimal) {
        self.balance -= amount;
    }

    /// Prepends a transaction to the recent buffer, evicting the oldest
    /// once the buffer exceeds `RECENT_LIMIT`.
    pub fn record_transaction(&mut self, transaction: Transaction) {
        self.recent.push_front(transaction);
        while self.recent.len() > RECENT_LIMIT {
            self.recent.pop_back();
        }
    }

    /// Up to `n` most recent transactions, most recent first. Returns a
    /// snapshot copy, never a live view of the buffer.
    pub fn recent_transactions(&self, n: usize) -> Vec<Transaction> {
        self.recent.iter().take(n).cloned().collect()
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Acc[{}] {} Bal:{:.2}",
            self.account_number, self.holder_name, self.balance
        )
    }
}
