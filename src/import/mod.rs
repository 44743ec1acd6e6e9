//! CSV import: header matching and record extraction.
//!
//! Bank exports name their columns inconsistently, so the header row is
//! matched case-insensitively against a list of synonyms per field. The
//! date, amount, and category columns are required; description is optional.

use csv::ReaderBuilder;

use crate::{Error, aggregate::RawRecord};

/// Accepted header names for the date column.
const DATE_COLUMNS: &[&str] = &[
    "date",
    "transaction_date",
    "transaction date",
    "time",
    "posted",
    "posting_date",
];

/// Accepted header names for the amount column.
const AMOUNT_COLUMNS: &[&str] = &["amount", "value", "price", "total", "sum", "debit"];

/// Accepted header names for the category column.
const CATEGORY_COLUMNS: &[&str] = &["category", "type", "expense_type", "expense type", "tag"];

/// Accepted header names for the optional description column.
const DESCRIPTION_COLUMNS: &[&str] = &["description", "memo", "note", "notes", "details", "payee"];

/// The resolved position of each field in a CSV header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    /// Index of the date column.
    pub date: usize,
    /// Index of the amount column.
    pub amount: usize,
    /// Index of the category column.
    pub category: usize,
    /// Index of the description column, if one was found.
    pub description: Option<usize>,
}

/// Match a header row against the accepted column names.
///
/// Matching ignores case and surrounding whitespace. The first header cell
/// matching a synonym wins for each field.
///
/// # Errors
/// Returns [Error::MissingColumn] naming the first required field for which
/// no header cell matched.
pub fn map_columns(headers: &csv::StringRecord) -> Result<ColumnMap, Error> {
    let find = |synonyms: &[&str]| {
        headers
            .iter()
            .position(|header| synonyms.contains(&header.trim().to_lowercase().as_str()))
    };

    let date = find(DATE_COLUMNS).ok_or(Error::MissingColumn("date"))?;
    let amount = find(AMOUNT_COLUMNS).ok_or(Error::MissingColumn("amount"))?;
    let category = find(CATEGORY_COLUMNS).ok_or(Error::MissingColumn("category"))?;
    let description = find(DESCRIPTION_COLUMNS);

    Ok(ColumnMap {
        date,
        amount,
        category,
        description,
    })
}

/// Parse CSV text into raw records using the header row to locate columns.
///
/// Rows shorter than the header are tolerated, missing cells come back as
/// empty strings and are dealt with downstream. No field-level validation
/// happens here.
///
/// # Errors
/// Returns [Error::MissingColumn] if a required column cannot be matched and
/// [Error::InvalidCsv] if the text is not parseable as CSV.
pub fn read_csv(text: &str) -> Result<Vec<RawRecord>, Error> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?;
    let columns = map_columns(headers)?;

    let cell = |record: &csv::StringRecord, index: usize| {
        record.get(index).unwrap_or_default().to_owned()
    };

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|error| Error::InvalidCsv(error.to_string()))?;

        records.push(RawRecord {
            date: cell(&row, columns.date),
            amount: cell(&row, columns.amount),
            category: cell(&row, columns.category),
            description: columns
                .description
                .map(|index| cell(&row, index))
                .unwrap_or_default(),
        });
    }

    tracing::debug!("read {} rows from CSV", records.len());

    Ok(records)
}
