pub mod accounts;
pub mod import;
pub mod imports;
pub mod init;
pub mod lookup;
pub mod status;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::settings::Settings;

pub(crate) fn open_ledger(settings: &Settings) -> anyhow::Result<Connection> {
    let db_path = settings.db_path();
    if let Some(dir) = db_path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
    }
    let conn = get_connection(&db_path)
        .with_context(|| format!("opening ledger {}", db_path.display()))?;
    init_db(&conn)?;
    Ok(conn)
}

#[derive(Parser)]
#[command(name = "bankimport", about = "Import bank statement credits into the bookkeeping ledger.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up the data directory, the ledger database and the credit account.
    Init {
        /// Path for ledger data (default: ~/Documents/bankimport)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Account that imported credits are booked against, e.g. 'Member fees'
        #[arg(long = "credit-account")]
        credit_account: Option<String>,
    },
    /// Manage ledger accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Import a semicolon separated statement export and book its credits.
    Import {
        /// Path to the statement file (ISO-8859-1 encoded)
        file: String,
        /// Source reference stored on every booking (default: the file path)
        #[arg(long)]
        source: Option<String>,
    },
    /// List previous imports.
    Imports,
    /// Find booked credits from a counterparty by IBAN and BIC.
    Lookup {
        #[arg(long)]
        iban: String,
        #[arg(long)]
        bic: String,
    },
    /// Show configuration and ledger statistics.
    Status,
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account.
    Add {
        /// Account name, e.g. 'Member fees'
        name: String,
        /// Account type: income, asset, liability, expense
        #[arg(long = "type", default_value = "income")]
        account_type: String,
    },
    /// List all accounts.
    List,
}
