use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::db::{create_booking, create_transaction, get_account, transaction_exists};
use crate::error::{ImportError, Result};
use crate::fingerprint::correlation_id;
use crate::models::{
    Account, FileIdentity, LedgerBooking, LedgerTransaction, ParsedTransaction,
    TransactionMetadata, TxKind,
};
use crate::parser::StatementFile;
use crate::settings::Settings;

/// A booking that could not be persisted. The rest of the file is still
/// attempted.
#[derive(Debug)]
pub struct RowFailure {
    pub nr: usize,
    pub error: ImportError,
}

#[derive(Debug)]
pub struct ImportResult {
    pub file_id: FileIdentity,
    pub seen: usize,
    pub credits: usize,
    pub booked: usize,
    pub duplicates: usize,
    pub failures: Vec<RowFailure>,
}

enum BookingOutcome {
    Booked(i64),
    Duplicate,
}

pub struct ImportPipeline {
    credit_account: Account,
    importer_tag: String,
}

impl ImportPipeline {
    pub fn new(credit_account: Account, importer_tag: &str) -> Self {
        Self {
            credit_account,
            importer_tag: importer_tag.to_string(),
        }
    }

    /// Resolve the configured credit account once, up front.
    pub fn from_settings(conn: &Connection, settings: &Settings) -> Result<Self> {
        let name = settings
            .credit_account
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ImportError::Configuration("no credit account configured".to_string()))?;
        let account = get_account(conn, name)?
            .ok_or_else(|| ImportError::UnknownAccount(name.to_string()))?;
        Ok(Self::new(account, &settings.importer_tag))
    }

    pub fn credit_account(&self) -> &Account {
        &self.credit_account
    }

    /// Book every credit of `file` that is not yet in the ledger. Each row is
    /// keyed by (file identity, position in the parsed sequence).
    pub fn import_file(
        &self,
        conn: &Connection,
        file: &StatementFile,
        source_reference: &str,
    ) -> Result<ImportResult> {
        let file_id = file.file_identity();
        info!(file = %file.path().display(), file_id = %file_id, "importing statement");

        let transactions = file.parse()?;

        let mut result = ImportResult {
            file_id: file_id.clone(),
            seen: transactions.len(),
            credits: 0,
            booked: 0,
            duplicates: 0,
            failures: Vec::new(),
        };

        for (nr, tx) in transactions.iter().enumerate() {
            if tx.kind != TxKind::Credit {
                continue;
            }
            result.credits += 1;
            match self.book(conn, &file_id, nr, tx, source_reference) {
                Ok(BookingOutcome::Booked(id)) => {
                    debug!(nr, transaction_id = id, amount = %tx.amount, "booked credit");
                    result.booked += 1;
                }
                Ok(BookingOutcome::Duplicate) => {
                    debug!(nr, "already booked, skipping");
                    result.duplicates += 1;
                }
                Err(error) => {
                    warn!(nr, %error, "failed to book credit");
                    result.failures.push(RowFailure { nr, error });
                }
            }
        }

        // Bookings are committed at this point; a history failure is logged only.
        if let Err(error) = record_import(conn, file, source_reference, &transactions, &result) {
            warn!(file_id = %file_id, %error, "failed to record import history");
        }

        info!(
            seen = result.seen,
            booked = result.booked,
            duplicates = result.duplicates,
            failures = result.failures.len(),
            "import finished"
        );
        Ok(result)
    }

    fn book(
        &self,
        conn: &Connection,
        file_id: &FileIdentity,
        nr: usize,
        tx: &ParsedTransaction,
        source_reference: &str,
    ) -> Result<BookingOutcome> {
        // IMMEDIATE takes the write lock before the existence check, so two
        // importers cannot both see the row as missing.
        let db_tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        if transaction_exists(&db_tx, file_id, nr)? {
            return Ok(BookingOutcome::Duplicate);
        }

        let ledger_tx = ledger_transaction(file_id, nr, tx);
        let transaction_id = match create_transaction(&db_tx, &ledger_tx) {
            Ok(id) => id,
            Err(e) if is_unique_violation(&e) => return Ok(BookingOutcome::Duplicate),
            Err(e) => return Err(e),
        };

        create_booking(
            &db_tx,
            &LedgerBooking {
                transaction_id,
                debit_account_id: self.credit_account.id,
                amount: tx.amount,
                source_reference: source_reference.to_string(),
                booking_datetime: ledger_tx.booking_datetime,
                memo: join_non_empty(&[&tx.counterparty_name, &tx.memo]),
                importer: self.importer_tag.clone(),
            },
        )?;
        db_tx.commit()?;
        Ok(BookingOutcome::Booked(transaction_id))
    }
}

fn ledger_transaction(file_id: &FileIdentity, nr: usize, tx: &ParsedTransaction) -> LedgerTransaction {
    LedgerTransaction {
        memo: join_non_empty(&[&tx.counterparty_name, &tx.iban, &tx.memo]),
        booking_datetime: midnight(tx.booking_date),
        value_datetime: midnight(tx.value_date),
        metadata: TransactionMetadata {
            file_id: file_id.0.clone(),
            row_index: nr,
            correlation_id: correlation_id(tx).0,
            counterparty_name: tx.counterparty_name.clone(),
            memo: tx.memo.clone(),
            iban: tx.iban.clone(),
            bic: tx.bic.clone(),
        },
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

fn join_non_empty(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn is_unique_violation(err: &ImportError) -> bool {
    matches!(
        err,
        ImportError::Db(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn record_import(
    conn: &Connection,
    file: &StatementFile,
    source_reference: &str,
    transactions: &[ParsedTransaction],
    result: &ImportResult,
) -> Result<()> {
    let min_date = transactions.iter().map(|t| t.booking_date).min();
    let max_date = transactions.iter().map(|t| t.booking_date).max();
    conn.execute(
        "INSERT INTO imports (filename, file_id, source_reference, seen, booked, duplicates, failures, date_range_start, date_range_end) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            file.filename(),
            result.file_id.0,
            source_reference,
            result.seen as i64,
            result.booked as i64,
            result.duplicates as i64,
            result.failures.len() as i64,
            min_date.map(|d| d.format("%Y-%m-%d").to_string()),
            max_date.map(|d| d.format("%Y-%m-%d").to_string()),
        ],
    )?;
    Ok(())
}
