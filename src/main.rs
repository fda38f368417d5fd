mod account;
mod audit;
mod error;
mod ledger;
mod store;
mod transaction;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::audit::AuditLog;
use crate::error::{LedgerError, Result};
use crate::ledger::Ledger;
use crate::store::Store;

const BANK_NAME: &str = "OpenSim Bank";

#[derive(Parser, Debug)]
#[clap(
    name = "bank-ledger",
    version,
    about = "Minimum-balance bank ledger with on-disk state"
)]
struct Cli {
    /// Directory holding the persisted ledger state and audit log.
    #[clap(long, value_parser, default_value = "data")]
    data_dir: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a new account with an initial deposit.
    Open {
        /// Full name of the account holder.
        #[clap(long, value_parser)]
        name: String,

        /// Government ID for KYC (e.g. Aadhaar/Passport).
        #[clap(long, value_parser)]
        government_id: String,

        /// Initial deposit; must meet the minimum balance.
        #[clap(long, value_parser)]
        deposit: Decimal,
    },

    /// Deposit into an account.
    Deposit {
        #[clap(value_parser)]
        account: u32,
        #[clap(value_parser)]
        amount: Decimal,
    },

    /// Withdraw from an account.
    Withdraw {
        #[clap(value_parser)]
        account: u32,
        #[clap(value_parser)]
        amount: Decimal,
    },

    /// Transfer between two accounts.
    Transfer {
        #[clap(value_parser)]
        from: u32,
        #[clap(value_parser)]
        to: u32,
        #[clap(value_parser)]
        amount: Decimal,
    },

    /// Balance enquiry.
    Balance {
        #[clap(value_parser)]
        account: u32,
    },

    /// Mini statement: the account's most recent transactions.
    Statement {
        #[clap(value_parser)]
        account: u32,

        /// How many transactions to show.
        #[clap(short = 'n', long, value_parser, default_value_t = 10)]
        count: usize,
    },

    /// List every account (admin).
    Accounts,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = std::fs::create_dir_all(&cli.data_dir) {
        warn!(error = %err, path = %cli.data_dir.display(), "failed to create data directory");
    }

    let store = Store::new(&cli.data_dir);
    let audit = AuditLog::new(cli.data_dir.join("audit.log"));
    let mut ledger = Ledger::open(BANK_NAME, store, audit);

    if let Err(err) = run(&mut ledger, cli.command) {
        eprintln!("Operation failed: {err}");
        std::process::exit(1);
    }
}

fn run(ledger: &mut Ledger, command: Command) -> Result<()> {
    match command {
        Command::Open {
            name,
            government_id,
            deposit,
        } => {
            let account = ledger.create_account(&name, &government_id, deposit)?;
            println!("Account created. Account No: {}", account.account_number());
        }
        Command::Deposit { account, amount } => {
            ledger.deposit(account, require_positive(amount)?)?;
            println!("Deposit successful.");
        }
        Command::Withdraw { account, amount } => {
            ledger.withdraw(account, require_positive(amount)?)?;
            println!("Withdrawal successful.");
        }
        Command::Transfer { from, to, amount } => {
            ledger.transfer(from, to, require_positive(amount)?)?;
            println!("Transfer successful.");
        }
        Command::Balance { account } => {
            println!("Account Holder's Name: {}", ledger.holder_name_of(account)?);
            println!(
                "Balance for account no. {}: {:.2}",
                account,
                ledger.balance_of(account)?
            );
        }
        Command::Statement { account, count } => {
            let transactions = ledger.mini_statement(account, count)?;
            println!("Last {} transactions:", transactions.len());
            for transaction in &transactions {
                println!("{transaction}");
            }
        }
        Command::Accounts => {
            for account in ledger.list_accounts() {
                println!("{account}");
            }
        }
    }
    Ok(())
}

/// Shell-side positivity check on parsed amounts. The ledger defends
/// against non-positive amounts as well.
fn require_positive(amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation("Amount must be positive".into()));
    }
    Ok(amount)
}
