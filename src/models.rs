use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Credit,
    Debit,
}

/// One transaction row of a statement, decoded. `amount` is always the
/// magnitude; the direction lives in `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransaction {
    pub kind: TxKind,
    pub booking_date: NaiveDate,
    pub value_date: NaiveDate,
    pub counterparty_name: String,
    pub memo: String,
    pub iban: String,
    pub bic: String,
    pub amount: Decimal,
}

/// Content-derived identity of an imported statement file (hex SHA-256).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity(pub String);

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Digest of a counterparty's IBAN + BIC, used to link recurring payers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(pub String);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub account_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    pub file_id: String,
    pub row_index: usize,
    pub correlation_id: String,
    pub counterparty_name: String,
    pub memo: String,
    pub iban: String,
    pub bic: String,
}

#[derive(Debug, Clone)]
pub struct LedgerTransaction {
    pub memo: String,
    pub booking_datetime: NaiveDateTime,
    pub value_datetime: NaiveDateTime,
    pub metadata: TransactionMetadata,
}

#[derive(Debug, Clone)]
pub struct LedgerBooking {
    pub transaction_id: i64,
    pub debit_account_id: i64,
    pub amount: Decimal,
    pub source_reference: String,
    pub booking_datetime: NaiveDateTime,
    pub memo: String,
    pub importer: String,
}

/// A booked credit as read back from the ledger.
#[derive(Debug, Clone)]
pub struct BookedTransaction {
    pub id: i64,
    pub booking_date: String,
    pub amount: Decimal,
    pub metadata: TransactionMetadata,
}

#[derive(Debug, Clone)]
pub struct ImportRecord {
    pub id: i64,
    pub filename: String,
    pub file_id: String,
    pub seen: i64,
    pub booked: i64,
    pub duplicates: i64,
    pub failures: i64,
    pub date_range_start: Option<String>,
    pub date_range_end: Option<String>,
    pub import_date: String,
}
