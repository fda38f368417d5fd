use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::account::Account;
use crate::ledger::FIRST_ACCOUNT_NUMBER;
use crate::transaction::Transaction;

#[derive(Error, Debug)]
enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The account-directory resource as written to disk: every account plus
/// the next-account-number counter. The per-account recent buffers are
/// not part of it; the ledger rebuilds them from the transaction log.
#[derive(Debug, Deserialize, Serialize)]
struct Directory {
    next_account_number: u32,
    accounts: Vec<Account>,
}

/// Persistence adapter for the ledger. Two independent resources under
/// one data directory: the account directory (JSON) and the full
/// transaction log (CSV, insertion order).
///
/// Both `save` and `load` degrade instead of failing: the in-memory
/// ledger stays authoritative for the life of the process, so an I/O
/// problem is worth a diagnostic, not an aborted banking operation.
#[derive(Debug)]
pub struct Store {
    accounts_path: PathBuf,
    transactions_path: PathBuf,
}

impl Store {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Store {
            accounts_path: data_dir.join("accounts.json"),
            transactions_path: data_dir.join("transactions.csv"),
        }
    }

    /// Writes both resources. Failures are logged and swallowed.
    pub fn save(
        &self,
        accounts: &HashMap<u32, Account>,
        next_account_number: u32,
        transactions: &[Transaction],
    ) {
        if let Err(err) = self.save_directory(accounts, next_account_number) {
            error!(error = %err, path = %self.accounts_path.display(), "failed to save account directory");
        }
        if let Err(err) = self.save_transactions(transactions) {
            error!(error = %err, path = %self.transactions_path.display(), "failed to save transaction log");
        }
    }

    /// Reads both resources back. A missing resource yields empty-state
    /// defaults; an unreadable or corrupt one is treated the same way,
    /// with a diagnostic, so startup never crashes on bad state files.
    pub fn load(&self) -> (HashMap<u32, Account>, u32, Vec<Transaction>) {
        let (accounts, next_account_number) = match self.load_directory() {
            Ok(Some(directory)) => {
                let accounts = directory
                    .accounts
                    .into_iter()
                    .map(|account| (account.account_number(), account))
                    .collect();
                (accounts, directory.next_account_number)
            }
            Ok(None) => (HashMap::new(), FIRST_ACCOUNT_NUMBER),
            Err(err) => {
                warn!(error = %err, path = %self.accounts_path.display(), "account directory unreadable, starting empty");
                (HashMap::new(), FIRST_ACCOUNT_NUMBER)
            }
        };

        let transactions = match self.load_transactions() {
            Ok(transactions) => transactions,
            Err(err) => {
                warn!(error = %err, path = %self.transactions_path.display(), "transaction log unreadable, starting empty");
                Vec::new()
            }
        };

        (accounts, next_account_number, transactions)
    }

    fn save_directory(
        &self,
        accounts: &HashMap<u32, Account>,
        next_account_number: u32,
    ) -> Result<(), StoreError> {
        let mut accounts: Vec<Account> = accounts.values().cloned().collect();
        accounts.sort_by_key(Account::account_number);

        let directory = Directory {
            next_account_number,
            accounts,
        };
        let file = File::create(&self.accounts_path)?;
        serde_json::to_writer_pretty(file, &directory)?;
        Ok(())
    }

    fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_path(&self.transactions_path)?;
        for transaction in transactions {
            writer.serialize(transaction)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn load_directory(&self) -> Result<Option<Directory>, StoreError> {
        if !self.accounts_path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.accounts_path)?;
        let directory = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(directory))
    }

    fn load_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        if !self.transactions_path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.transactions_path)?;
        let mut transactions = Vec::new();
        for record in reader.deserialize::<Transaction>() {
            transactions.push(record?);
        }
        Ok(transactions)
    }
}
