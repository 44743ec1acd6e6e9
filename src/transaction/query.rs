//! Filtered queries, statistics, and bulk import for the transaction store.

use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    aggregate::{RawRecord, parse_amount, parse_date},
    transaction::{Transaction, create_transaction, map_transaction_row},
};

/// Optional predicates for [fetch_transactions], combined with logical AND.
///
/// Date and amount ranges are half-open: the lower bound is inclusive and the
/// upper bound is exclusive.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Keep only transactions with exactly this category.
    pub category: Option<String>,
    /// Keep only transactions on or after this date.
    pub date_from: Option<Date>,
    /// Keep only transactions strictly before this date.
    pub date_to: Option<Date>,
    /// Keep only transactions with an amount of at least this value.
    pub amount_min: Option<f64>,
    /// Keep only transactions with an amount strictly below this value.
    pub amount_max: Option<f64>,
}

/// Summary statistics over the whole transaction store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    /// The total number of transactions.
    pub count: u32,
    /// The sum of the absolute values of all negative amounts.
    pub total_expense: f64,
    /// The sum of all positive amounts.
    pub total_income: f64,
    /// `total_income - total_expense`.
    pub net: f64,
    /// The earliest transaction date, or `None` on an empty store.
    pub date_min: Option<Date>,
    /// The latest transaction date, or `None` on an empty store.
    pub date_max: Option<Date>,
    /// The number of distinct categories.
    pub category_count: u32,
}

/// Retrieve transactions matching `filter`, ordered by date descending and
/// then by ID descending so that same-date rows keep a stable order.
///
/// An empty filter returns the entire store.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn fetch_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(category) = &filter.category {
        conditions.push("category = ?");
        params.push(Value::Text(category.clone()));
    }

    // Dates are stored as ISO-8601 text, so lexicographic comparison in SQL
    // matches chronological order.
    if let Some(date_from) = filter.date_from {
        conditions.push("date >= ?");
        params.push(Value::Text(date_from.to_string()));
    }

    if let Some(date_to) = filter.date_to {
        conditions.push("date < ?");
        params.push(Value::Text(date_to.to_string()));
    }

    if let Some(amount_min) = filter.amount_min {
        conditions.push("amount >= ?");
        params.push(Value::Real(amount_min));
    }

    if let Some(amount_max) = filter.amount_max {
        conditions.push("amount < ?");
        params.push(Value::Real(amount_max));
    }

    let mut query = String::from(
        "SELECT id, date, amount, category, description, created_at, updated_at FROM \"transaction\"",
    );

    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }

    query.push_str(" ORDER BY date DESC, id DESC");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Get every category present in the store, in alphabetical order.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn distinct_categories(connection: &Connection) -> Result<Vec<String>, Error> {
    connection
        .prepare("SELECT DISTINCT category FROM \"transaction\" ORDER BY category")?
        .query_map([], |row| row.get(0))?
        .map(|category_result| category_result.map_err(Error::from))
        .collect()
}

/// Compute [StoreStats] over the whole store in a single query.
///
/// On an empty store the sums are zero and the date bounds are `None`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn transaction_stats(connection: &Connection) -> Result<StoreStats, Error> {
    connection
        .query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN amount < 0 THEN -amount ELSE 0 END), 0.0),
                    COALESCE(SUM(CASE WHEN amount > 0 THEN amount ELSE 0 END), 0.0),
                    MIN(date),
                    MAX(date),
                    COUNT(DISTINCT category)
             FROM \"transaction\"",
            [],
            |row| {
                let total_expense: f64 = row.get(1)?;
                let total_income: f64 = row.get(2)?;

                Ok(StoreStats {
                    count: row.get(0)?,
                    total_expense,
                    total_income,
                    net: total_income - total_expense,
                    date_min: row.get(3)?,
                    date_max: row.get(4)?,
                    category_count: row.get(5)?,
                })
            },
        )
        .map_err(Error::from)
}

/// Insert a batch of raw records, skipping rows with an unparseable date, a
/// non-numeric amount, or an empty category.
///
/// Partial success is expected and is not a failure: the return value is the
/// number of rows actually inserted. Skipped rows are logged at debug level
/// and counted nowhere.
///
/// # Errors
/// This function will return an [Error::SqlError] if an insert fails at the
/// SQL level. Row-level data quality issues never produce an error.
pub fn bulk_import(records: &[RawRecord], connection: &Connection) -> Result<usize, Error> {
    let mut imported = 0;

    for record in records {
        let date = match parse_date(&record.date, None) {
            Ok(date) => date,
            Err(_) => {
                tracing::debug!("skipping row with unparseable date {:?}", record.date);
                continue;
            }
        };

        let amount = match parse_amount(&record.amount) {
            Ok(amount) => amount,
            Err(_) => {
                tracing::debug!("skipping row with non-numeric amount {:?}", record.amount);
                continue;
            }
        };

        if record.category.trim().is_empty() {
            tracing::debug!("skipping row with empty category");
            continue;
        }

        create_transaction(
            Transaction::build(date, amount, &record.category).description(&record.description),
            connection,
        )?;
        imported += 1;
    }

    tracing::info!("imported {imported} of {} rows", records.len());

    Ok(imported)
}
