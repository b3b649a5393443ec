// Fixed column positions of a transaction row in the export.
pub const COL_BOOKING_DATE: usize = 0;
pub const COL_VALUE_DATE: usize = 1;
pub const COL_MARKER: usize = 2;
pub const COL_NAME: usize = 3;
pub const COL_MEMO: usize = 4;
pub const COL_IBAN: usize = 5;
pub const COL_BIC: usize = 6;
pub const COL_DEBIT: usize = 15;
pub const COL_CREDIT: usize = 16;

/// Fewest fields a row needs before every column above can be indexed.
pub const MIN_TRANSACTION_FIELDS: usize = COL_CREDIT + 1;

pub const SEPA_MARKER: &str = "SEPA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Transaction,
    Ignore,
}

/// Headers, balances and account metadata share the file with transactions;
/// only rows long enough for the layout and carrying the SEPA marker count.
pub fn classify(row: &[String]) -> RowKind {
    if row.len() < MIN_TRANSACTION_FIELDS {
        return RowKind::Ignore;
    }
    if row[COL_MARKER].contains(SEPA_MARKER) {
        RowKind::Transaction
    } else {
        RowKind::Ignore
    }
}
