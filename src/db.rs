use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{
    Account, BookedTransaction, CorrelationId, FileIdentity, ImportRecord, LedgerBooking,
    LedgerTransaction,
};

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    account_type TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    memo TEXT NOT NULL,
    booking_datetime TEXT NOT NULL,
    value_datetime TEXT NOT NULL,
    file_id TEXT NOT NULL,
    row_nr INTEGER NOT NULL,
    correlation_id TEXT NOT NULL,
    metadata TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    UNIQUE (file_id, row_nr)
);

CREATE INDEX IF NOT EXISTS idx_transactions_correlation ON transactions(correlation_id);

CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY,
    transaction_id INTEGER NOT NULL,
    debit_account_id INTEGER NOT NULL,
    amount TEXT NOT NULL,
    source_reference TEXT NOT NULL,
    booking_datetime TEXT NOT NULL,
    memo TEXT NOT NULL,
    importer TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (transaction_id) REFERENCES transactions(id),
    FOREIGN KEY (debit_account_id) REFERENCES accounts(id)
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    file_id TEXT NOT NULL,
    source_reference TEXT NOT NULL,
    seen INTEGER NOT NULL,
    booked INTEGER NOT NULL,
    duplicates INTEGER NOT NULL,
    failures INTEGER NOT NULL,
    date_range_start TEXT,
    date_range_end TEXT,
    import_date TEXT DEFAULT (datetime('now'))
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    // Concurrent importers queue on the write lock instead of failing.
    conn.busy_timeout(Duration::from_secs(10))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub fn get_account(conn: &Connection, name: &str) -> Result<Option<Account>> {
    let account = conn
        .query_row(
            "SELECT id, name, account_type FROM accounts WHERE name = ?1",
            [name],
            |row| {
                Ok(Account {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    account_type: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(account)
}

pub fn add_account(conn: &Connection, name: &str, account_type: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO accounts (name, account_type) VALUES (?1, ?2)",
        rusqlite::params![name, account_type],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT id, name, account_type FROM accounts ORDER BY name")?;
    let accounts = stmt
        .query_map([], |row| {
            Ok(Account {
                id: row.get(0)?,
                name: row.get(1)?,
                account_type: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(accounts)
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

pub fn transaction_exists(conn: &Connection, file_id: &FileIdentity, nr: usize) -> Result<bool> {
    let mut stmt =
        conn.prepare_cached("SELECT 1 FROM transactions WHERE file_id = ?1 AND row_nr = ?2")?;
    Ok(stmt.exists(rusqlite::params![file_id.0, nr as i64])?)
}

pub fn create_transaction(conn: &Connection, tx: &LedgerTransaction) -> Result<i64> {
    let metadata = serde_json::to_string(&tx.metadata)?;
    conn.execute(
        "INSERT INTO transactions (memo, booking_datetime, value_datetime, file_id, row_nr, correlation_id, metadata) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            tx.memo,
            tx.booking_datetime.format(DATETIME_FORMAT).to_string(),
            tx.value_datetime.format(DATETIME_FORMAT).to_string(),
            tx.metadata.file_id,
            tx.metadata.row_index as i64,
            tx.metadata.correlation_id,
            metadata,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn create_booking(conn: &Connection, booking: &LedgerBooking) -> Result<i64> {
    conn.execute(
        "INSERT INTO bookings (transaction_id, debit_account_id, amount, source_reference, booking_datetime, memo, importer) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            booking.transaction_id,
            booking.debit_account_id,
            booking.amount.to_string(),
            booking.source_reference,
            booking.booking_datetime.format(DATETIME_FORMAT).to_string(),
            booking.memo,
            booking.importer,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Booked credits whose counterparty fingerprint matches `id`, oldest first.
pub fn find_by_correlation(conn: &Connection, id: &CorrelationId) -> Result<Vec<BookedTransaction>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, date(b.booking_datetime), b.amount, t.metadata \
         FROM transactions t JOIN bookings b ON b.transaction_id = t.id \
         WHERE t.correlation_id = ?1 ORDER BY b.booking_datetime, t.id",
    )?;
    let rows: Vec<(i64, String, Decimal, String)> = stmt
        .query_map([&id.0], |row| {
            let amount: String = row.get(2)?;
            let amount = Decimal::from_str(&amount).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
            })?;
            Ok((row.get(0)?, row.get(1)?, amount, row.get(3)?))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut booked = Vec::with_capacity(rows.len());
    for (id, booking_date, amount, metadata) in rows {
        booked.push(BookedTransaction {
            id,
            booking_date,
            amount,
            metadata: serde_json::from_str(&metadata)?,
        });
    }
    Ok(booked)
}

pub fn list_imports(conn: &Connection) -> Result<Vec<ImportRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, filename, file_id, seen, booked, duplicates, failures, \
         date_range_start, date_range_end, import_date FROM imports ORDER BY id",
    )?;
    let imports = stmt
        .query_map([], |row| {
            Ok(ImportRecord {
                id: row.get(0)?,
                filename: row.get(1)?,
                file_id: row.get(2)?,
                seen: row.get(3)?,
                booked: row.get(4)?,
                duplicates: row.get(5)?,
                failures: row.get(6)?,
                date_range_start: row.get(7)?,
                date_range_end: row.get(8)?,
                import_date: row.get(9)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(imports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionMetadata;
    use chrono::NaiveDate;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn ledger_tx(file_id: &str, nr: usize) -> LedgerTransaction {
        let dt = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
        LedgerTransaction {
            memo: "Jörg Müller | DE89370400440532013000 | Beitrag".to_string(),
            booking_datetime: dt,
            value_datetime: dt,
            metadata: TransactionMetadata {
                file_id: file_id.to_string(),
                row_index: nr,
                correlation_id: "abc".to_string(),
                counterparty_name: "Jörg Müller".to_string(),
                memo: "Beitrag".to_string(),
                iban: "DE89370400440532013000".to_string(),
                bic: "COBADEFFXXX".to_string(),
            },
        }
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["accounts", "transactions", "bookings", "imports"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_account_lookup() {
        let (_dir, conn) = test_db();
        assert_eq!(get_account(&conn, "Member fees").unwrap(), None);
        let id = add_account(&conn, "Member fees", "income").unwrap();
        let account = get_account(&conn, "Member fees").unwrap().unwrap();
        assert_eq!(account.id, id);
        assert_eq!(account.account_type, "income");
        assert_eq!(list_accounts(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_account_names_are_unique() {
        let (_dir, conn) = test_db();
        add_account(&conn, "Member fees", "income").unwrap();
        assert!(add_account(&conn, "Member fees", "income").is_err());
    }

    #[test]
    fn test_transaction_exists_after_create() {
        let (_dir, conn) = test_db();
        let file_id = FileIdentity("f1".to_string());
        assert!(!transaction_exists(&conn, &file_id, 0).unwrap());
        create_transaction(&conn, &ledger_tx("f1", 0)).unwrap();
        assert!(transaction_exists(&conn, &file_id, 0).unwrap());
        assert!(!transaction_exists(&conn, &file_id, 1).unwrap());
        assert!(!transaction_exists(&conn, &FileIdentity("f2".to_string()), 0).unwrap());
    }

    #[test]
    fn test_file_row_pair_is_unique() {
        let (_dir, conn) = test_db();
        create_transaction(&conn, &ledger_tx("f1", 3)).unwrap();
        let err = create_transaction(&conn, &ledger_tx("f1", 3)).unwrap_err();
        match err {
            crate::error::ImportError::Db(e) => {
                assert_eq!(e.sqlite_error_code(), Some(rusqlite::ErrorCode::ConstraintViolation));
            }
            other => panic!("expected constraint violation, got {other:?}"),
        }
        create_transaction(&conn, &ledger_tx("f2", 3)).unwrap();
    }

    #[test]
    fn test_find_by_correlation_reads_back_booking() {
        let (_dir, conn) = test_db();
        let account_id = add_account(&conn, "Member fees", "income").unwrap();
        let tx = ledger_tx("f1", 0);
        let tx_id = create_transaction(&conn, &tx).unwrap();
        create_booking(
            &conn,
            &LedgerBooking {
                transaction_id: tx_id,
                debit_account_id: account_id,
                amount: Decimal::new(123456, 2),
                source_reference: "upload-1".to_string(),
                booking_datetime: tx.booking_datetime,
                memo: "Jörg Müller | Beitrag".to_string(),
                importer: "bankimport".to_string(),
            },
        )
        .unwrap();

        let found = find_by_correlation(&conn, &CorrelationId("abc".to_string())).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, tx_id);
        assert_eq!(found[0].booking_date, "2020-01-02");
        assert_eq!(found[0].amount, Decimal::new(123456, 2));
        assert_eq!(found[0].metadata, tx.metadata);
        assert!(find_by_correlation(&conn, &CorrelationId("zzz".to_string())).unwrap().is_empty());
    }
}
