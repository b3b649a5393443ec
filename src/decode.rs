use std::num::IntErrorKind;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed date '{0}', expected DD.MM.YYYY")]
    MalformedDate(String),

    #[error("'{0}' is not a calendar date")]
    InvalidCalendarDate(String),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}

/// Day, month and year as written in the statement, after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementDate {
    pub day: i64,
    pub month: i64,
    pub year: i64,
}

impl StatementDate {
    pub fn to_date(self) -> Option<NaiveDate> {
        let year = i32::try_from(self.year).ok()?;
        let month = u32::try_from(self.month).ok()?;
        let day = u32::try_from(self.day).ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

// Non-numeric and non-positive components become 1. Integers too large for
// i64 saturate, so the calendar conversion rejects them.
fn positive_or_one(raw: &str) -> i64 {
    match raw.trim().parse::<i64>() {
        Ok(v) if v >= 1 => v,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
        _ => 1,
    }
}

/// Decode a `DD.MM.YYYY` date. Only the component count is strict; each
/// component that is not a positive integer is coerced to 1.
pub fn decode_date(raw: &str) -> Result<StatementDate, DecodeError> {
    let parts: Vec<&str> = raw.split('.').collect();
    let [dd, mm, yyyy] = parts.as_slice() else {
        return Err(DecodeError::MalformedDate(raw.to_string()));
    };
    Ok(StatementDate {
        day: positive_or_one(dd),
        month: positive_or_one(mm),
        year: positive_or_one(yyyy),
    })
}

pub fn decode_calendar_date(raw: &str) -> Result<NaiveDate, DecodeError> {
    decode_date(raw)?
        .to_date()
        .ok_or_else(|| DecodeError::InvalidCalendarDate(raw.to_string()))
}

/// Decode a German formatted amount: `.` groups thousands, `,` marks decimals.
pub fn decode_amount(raw: &str) -> Result<Decimal, DecodeError> {
    let normalized = raw.replace('.', "").replace(',', ".");
    Decimal::from_str(normalized.trim()).map_err(|_| DecodeError::InvalidAmount(raw.to_string()))
}

/// ISO-8859-1 maps every byte to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
