//! Parsing of raw record fields into typed values.
//!
//! Records arrive as strings (from CSV files or external callers) and each
//! field is parsed independently. A field that fails to parse yields a
//! [DropReason] so callers can decide whether to skip the row or report it.

use serde::{Deserialize, Serialize};
use time::{
    Date,
    format_description::{self, BorrowedFormatItem},
    macros::format_description,
};

use crate::transaction::Transaction;

/// A transaction-shaped record whose fields have not been validated yet.
///
/// This is the input type for the aggregation functions and bulk import. The
/// store's [Transaction] converts into it losslessly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// The transaction date as text, e.g. "2024-01-15" or "01/15/2024".
    pub date: String,
    /// The signed amount as text. Negative values are expenses.
    pub amount: String,
    /// The free-form category label.
    pub category: String,
    /// An optional free-form note. Empty when absent.
    pub description: String,
}

impl From<&Transaction> for RawRecord {
    fn from(transaction: &Transaction) -> Self {
        Self {
            date: transaction.date.to_string(),
            amount: transaction.amount.to_string(),
            category: transaction.category.clone(),
            description: transaction.description.clone(),
        }
    }
}

/// Why a record field was rejected during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The amount was not a finite number.
    InvalidAmount,
    /// The date matched none of the accepted formats.
    UnparseableDate,
}

const ISO_DATE: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Formats tried in order when no explicit format is given and the text is
/// not an ISO date. An ambiguous string such as "01/02/2024" therefore
/// resolves as month first.
const FALLBACK_DATE_FORMATS: &[&[BorrowedFormatItem]] = &[
    format_description!("[month]/[day]/[year]"),
    format_description!("[day]/[month]/[year]"),
    format_description!("[year]/[month]/[day]"),
    format_description!("[month]-[day]-[year]"),
];

/// Parse an amount string into a signed number.
///
/// Leading and trailing whitespace is ignored. Non-finite values (NaN,
/// infinities) are rejected along with anything that is not a number.
pub fn parse_amount(text: &str) -> Result<f64, DropReason> {
    let amount: f64 = text.trim().parse().map_err(|_| DropReason::InvalidAmount)?;

    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(DropReason::InvalidAmount)
    }
}

/// Parse a date string into a calendar date.
///
/// When `explicit_format` is given (in the `time` crate's format description
/// syntax, e.g. "[month]/[day]/[year]") it is tried first. After that the
/// text is tried as an ISO date and then against [FALLBACK_DATE_FORMATS].
pub fn parse_date(text: &str, explicit_format: Option<&str>) -> Result<Date, DropReason> {
    let text = text.trim();

    if let Some(format) = explicit_format {
        if let Ok(items) = format_description::parse(format) {
            if let Ok(date) = Date::parse(text, items.as_slice()) {
                return Ok(date);
            }
        }
    }

    if let Ok(date) = Date::parse(text, ISO_DATE) {
        return Ok(date);
    }

    for format in FALLBACK_DATE_FORMATS {
        if let Ok(date) = Date::parse(text, format) {
            return Ok(date);
        }
    }

    Err(DropReason::UnparseableDate)
}
