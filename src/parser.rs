use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::classify::{
    classify, RowKind, COL_BIC, COL_BOOKING_DATE, COL_CREDIT, COL_DEBIT, COL_IBAN, COL_MEMO,
    COL_NAME, COL_VALUE_DATE,
};
use crate::decode::{decode_amount, decode_calendar_date, decode_latin1, DecodeError};
use crate::error::{ImportError, Result};
use crate::models::{FileIdentity, ParsedTransaction, TxKind};

/// A statement export held in memory, so identity and parsing see the
/// same bytes.
#[derive(Debug, Clone)]
pub struct StatementFile {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl StatementFile {
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Self {
        Self {
            path: path.to_path_buf(),
            bytes,
        }
    }

    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_identity(&self) -> FileIdentity {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        FileIdentity(hex::encode(hasher.finalize()))
    }

    pub fn parse(&self) -> Result<Vec<ParsedTransaction>> {
        parse(self.bytes.as_slice())
    }
}

/// Parse a Latin-1 encoded, semicolon separated statement export. Rows that
/// are not transactions are dropped; a transaction row that fails to decode
/// aborts the whole parse.
pub fn parse<R: Read>(reader: R) -> Result<Vec<ParsedTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b';')
        .quote(b'"')
        .from_reader(reader);

    let mut transactions = Vec::new();
    let mut ignored = 0usize;
    for result in rdr.byte_records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let row: Vec<String> = record.iter().map(decode_latin1).collect();
        match classify(&row) {
            RowKind::Ignore => ignored += 1,
            RowKind::Transaction => {
                let tx = parse_transaction(&row).map_err(|e| ImportError::Decode {
                    line,
                    message: e.to_string(),
                })?;
                transactions.push(tx);
            }
        }
    }
    debug!(transactions = transactions.len(), ignored, "parsed statement");
    Ok(transactions)
}

fn parse_transaction(row: &[String]) -> std::result::Result<ParsedTransaction, DecodeError> {
    let booking_date = decode_calendar_date(&row[COL_BOOKING_DATE])?;
    let value_date = decode_calendar_date(&row[COL_VALUE_DATE])?;
    let (kind, raw_amount) = if row[COL_DEBIT].is_empty() {
        (TxKind::Credit, &row[COL_CREDIT])
    } else {
        (TxKind::Debit, &row[COL_DEBIT])
    };
    let amount = decode_amount(raw_amount)?.abs();

    Ok(ParsedTransaction {
        kind,
        booking_date,
        value_date,
        counterparty_name: row[COL_NAME].clone(),
        memo: row[COL_MEMO].clone(),
        iban: row[COL_IBAN].clone(),
        bic: row[COL_BIC].clone(),
        amount,
    })
}
