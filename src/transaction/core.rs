//! Defines the core data model and CRUD queries for transactions.

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The database ID of a transaction.
pub type TransactionId = i64;

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Negative amounts are expenses, positive amounts are income. To create a
/// new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned on creation and stable for the
    /// lifetime of the record.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// The user-defined grouping label, e.g. "Groceries" or "Rent".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the record was inserted, set by the store.
    pub created_at: OffsetDateTime,
    /// When the record was last modified, refreshed by the store on update.
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(date: Date, amount: f64, category: &str) -> TransactionBuilder {
        TransactionBuilder {
            date,
            amount,
            category: category.to_owned(),
            description: String::new(),
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// The builder holds the mutable fields of a transaction. Pass it to
/// [create_transaction] to insert a new row, or to [update_transaction] to
/// replace the fields of an existing one.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let builder = Transaction::build(date!(2024 - 01 - 15), -45.99, "Food")
///     .description("Coffee shop purchase");
/// let transaction = create_transaction(builder, &connection)?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The date when the transaction occurred.
    ///
    /// `time::Date` only represents valid calendar dates, so date validation
    /// happens wherever a date string is parsed, not here.
    pub date: Date,

    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income, negative values represent expenses.
    /// Zero is accepted by the store; rejecting it is an entry-form concern.
    pub amount: f64,

    /// The category of the transaction, e.g. "Groceries", "Transport".
    ///
    /// Must be non-empty. Categories are plain strings, not a separate
    /// entity, so two transactions sharing a category string are not
    /// otherwise linked.
    pub category: String,

    /// A human-readable description of the transaction. Defaults to the
    /// empty string.
    pub description: String,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    fn validate(&self) -> Result<(), Error> {
        if self.category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }

        if !self.amount.is_finite() {
            return Err(Error::InvalidAmount(self.amount.to_string()));
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// The store sets the `created_at` and `updated_at` audit timestamps.
///
/// # Errors
/// This function will return an:
/// - [Error::EmptyCategory] if the category is empty or whitespace,
/// - or [Error::InvalidAmount] if the amount is NaN or infinite,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let now = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (date, amount, category, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, date, amount, category, description, created_at, updated_at",
        )?
        .query_row(
            (
                builder.date,
                builder.amount,
                builder.category.as_str(),
                builder.description.as_str(),
                now,
                now,
            ),
            map_transaction_row,
        )?;

    tracing::debug!(
        "created transaction {}: {} {} on {}",
        transaction.id,
        transaction.category,
        transaction.amount,
        transaction.date
    );

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// Returns `Ok(None)` if `id` does not refer to a transaction.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, amount, category, description, created_at, updated_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)
        .optional()
        .map_err(Error::from)
}

/// Replace the mutable fields of an existing transaction and refresh its
/// `updated_at` timestamp.
///
/// Returns `Ok(false)` if `id` does not refer to a transaction. Absence is
/// not exceptional for updates, the caller can easily check the flag.
///
/// # Errors
/// Same validation errors as [create_transaction], plus [Error::SqlError].
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<bool, Error> {
    builder.validate()?;

    let changed = connection.execute(
        "UPDATE \"transaction\"
         SET date = ?1, amount = ?2, category = ?3, description = ?4, updated_at = ?5
         WHERE id = ?6",
        (
            builder.date,
            builder.amount,
            builder.category.as_str(),
            builder.description.as_str(),
            OffsetDateTime::now_utc(),
            id,
        ),
    )?;

    if changed == 0 {
        tracing::warn!("no transaction found with ID {id}");
    }

    Ok(changed > 0)
}

/// Permanently delete a transaction.
///
/// Returns `Ok(false)` if `id` does not refer to a transaction.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<bool, Error> {
    let deleted = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

    if deleted == 0 {
        tracing::warn!("no transaction found with ID {id}");
    }

    Ok(deleted > 0)
}

/// Permanently delete every transaction and return how many were removed.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_all_transactions(connection: &Connection) -> Result<usize, Error> {
    let deleted = connection.execute("DELETE FROM \"transaction\"", ())?;

    tracing::info!("deleted all {deleted} transactions");

    Ok(deleted)
}

/// Map a database row to a [Transaction].
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
