use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use crate::account::Account;
use crate::audit::AuditLog;
use crate::error::{LedgerError, Result};
use crate::store::Store;
use crate::transaction::{Transaction, TransactionType};

/// Policy floor below which no account may fall after a committed
/// operation. Opening deposits must meet it too.
pub const MIN_BALANCE: Decimal = dec!(500);

/// Account numbers are allocated from here, post-incremented per account.
pub const FIRST_ACCOUNT_NUMBER: u32 = 1001;

/// The ledger owns the account directory, the global append-only
/// transaction log, account-number allocation, and persistence.
///
/// Every mutating operation validates fully before touching any state,
/// then mutates, appends to the log, writes an audit line, and saves to
/// disk before returning. Audit and save failures degrade to diagnostics.
///
/// Mutators take `&mut self` and queries `&self`: one exclusive borrow is
/// one whole-ledger critical section, so operations cannot interleave.
/// A multi-threaded caller gets the same guarantee from `Mutex<Ledger>`.
#[derive(Debug)]
pub struct Ledger {
    name: String,
    accounts: HashMap<u32, Account>,
    transactions: Vec<Transaction>,
    next_account_number: u32,
    store: Store,
    audit: AuditLog,
}

impl Ledger {
    /// Constructs the ledger, hydrating from any previously saved state.
    /// The per-account recent buffers are not persisted, so they are
    /// rebuilt here by replaying the loaded log in chronological order.
    pub fn open(name: impl Into<String>, store: Store, audit: AuditLog) -> Self {
        let (mut accounts, next_account_number, transactions) = store.load();

        for transaction in &transactions {
            if let Some(account) = accounts.get_mut(&transaction.account_number()) {
                account.record_transaction(transaction.clone());
            }
        }

        info!(
            accounts = accounts.len(),
            transactions = transactions.len(),
            "ledger state loaded"
        );

        Ledger {
            name: name.into(),
            accounts,
            transactions,
            next_account_number: next_account_number.max(FIRST_ACCOUNT_NUMBER),
            store,
            audit,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opens an account after KYC and minimum-deposit checks. No account
    /// number is allocated when a check fails.
    pub fn create_account(
        &mut self,
        holder_name: &str,
        government_id: &str,
        initial_deposit: Decimal,
    ) -> Result<Account> {
        if holder_name.chars().count() < 3 {
            return Err(LedgerError::Kyc("Name too short for KYC".into()));
        }
        if government_id.chars().count() < 4 {
            return Err(LedgerError::Kyc("Invalid government ID for KYC".into()));
        }
        if initial_deposit < MIN_BALANCE {
            return Err(LedgerError::Validation(format!(
                "Initial deposit must be at least minimum balance: {MIN_BALANCE:.2}"
            )));
        }

        let account_number = self.next_account_number;
        self.next_account_number += 1;

        let mut account = Account::new(account_number, holder_name, government_id, initial_deposit);
        let transaction = Transaction::new(
            account_number,
            TransactionType::Deposit,
            initial_deposit,
            "Initial deposit",
        );
        account.record_transaction(transaction.clone());
        self.transactions.push(transaction);
        self.accounts.insert(account_number, account.clone());

        self.audit.record(
            "CREATE_ACCOUNT",
            &format!("Acc:{account_number} Name:{holder_name} Init:{initial_deposit:.2}"),
        );
        self.persist();
        Ok(account)
    }

    pub fn deposit(&mut self, account_number: u32, amount: Decimal) -> Result<()> {
        Self::require_positive(amount)?;
        let account = self
            .accounts
            .get_mut(&account_number)
            .ok_or(LedgerError::AccountNotFound(account_number))?;

        account.credit(amount);
        let transaction =
            Transaction::new(account_number, TransactionType::Deposit, amount, "Deposit");
        account.record_transaction(transaction.clone());
        self.transactions.push(transaction);

        self.audit.record(
            "DEPOSIT",
            &format!("Acc:{account_number} Amount:{amount:.2}"),
        );
        self.persist();
        Ok(())
    }

    pub fn withdraw(&mut self, account_number: u32, amount: Decimal) -> Result<()> {
        Self::require_positive(amount)?;
        let account = self
            .accounts
            .get_mut(&account_number)
            .ok_or(LedgerError::AccountNotFound(account_number))?;

        if account.balance() - amount < MIN_BALANCE {
            return Err(LedgerError::InsufficientBalance {
                account: account_number,
                requested: amount,
                balance: account.balance(),
            });
        }

        account.debit(amount);
        let transaction =
            Transaction::new(account_number, TransactionType::Withdraw, amount, "Withdraw");
        account.record_transaction(transaction.clone());
        self.transactions.push(transaction);

        self.audit.record(
            "WITHDRAW",
            &format!("Acc:{account_number} Amount:{amount:.2}"),
        );
        self.persist();
        Ok(())
    }

    /// Moves funds between two accounts. Both legs are applied before
    /// anything is persisted, so no observer sees a half-done transfer.
    pub fn transfer(&mut self, from: u32, to: u32, amount: Decimal) -> Result<()> {
        if from == to {
            return Err(LedgerError::Validation(
                "Cannot transfer to same account".into(),
            ));
        }
        Self::require_positive(amount)?;

        let balance = self
            .accounts
            .get(&from)
            .ok_or(LedgerError::AccountNotFound(from))?
            .balance();
        if !self.accounts.contains_key(&to) {
            return Err(LedgerError::AccountNotFound(to));
        }
        if balance - amount < MIN_BALANCE {
            return Err(LedgerError::InsufficientBalance {
                account: from,
                requested: amount,
                balance,
            });
        }

        let outgoing = Transaction::new(
            from,
            TransactionType::TransferOut,
            amount,
            format!("Transfer to {to}"),
        );
        let incoming = Transaction::new(
            to,
            TransactionType::TransferIn,
            amount,
            format!("Transfer from {from}"),
        );

        let source = self
            .accounts
            .get_mut(&from)
            .expect("source account existence checked above");
        source.debit(amount);
        source.record_transaction(outgoing.clone());

        let destination = self
            .accounts
            .get_mut(&to)
            .expect("destination account existence checked above");
        destination.credit(amount);
        destination.record_transaction(incoming.clone());

        self.transactions.push(outgoing);
        self.transactions.push(incoming);

        self.audit.record(
            "TRANSFER",
            &format!("From:{from} To:{to} Amount:{amount:.2}"),
        );
        self.persist();
        Ok(())
    }

    pub fn balance_of(&self, account_number: u32) -> Result<Decimal> {
        Ok(self.account(account_number)?.balance())
    }

    pub fn holder_name_of(&self, account_number: u32) -> Result<&str> {
        Ok(self.account(account_number)?.holder_name())
    }

    /// Up to `n` most recent transactions for one account, most recent
    /// first, served from the account's bounded buffer.
    pub fn mini_statement(&self, account_number: u32, n: usize) -> Result<Vec<Transaction>> {
        Ok(self.account(account_number)?.recent_transactions(n))
    }

    /// Snapshot of the full account directory, ordered by account number.
    pub fn list_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.accounts.values().cloned().collect();
        accounts.sort_by_key(Account::account_number);
        accounts
    }

    /// The global log: every transaction ever applied, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    fn account(&self, account_number: u32) -> Result<&Account> {
        self.accounts
            .get(&account_number)
            .ok_or(LedgerError::AccountNotFound(account_number))
    }

    fn require_positive(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::Validation("Amount must be positive".into()));
        }
        Ok(())
    }

    fn persist(&self) {
        self.store
            .save(&self.accounts, self.next_account_number, &self.transactions);
    }
}
