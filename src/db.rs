//! Creates and initializes the application's SQLite database.

use rusqlite::Connection;

use crate::Error;

/// Add the application tables and indexes to the database.
///
/// Safe to call on every startup, the schema statements are all
/// `IF NOT EXISTS`.
///
/// # Errors
/// Returns an error if the schema cannot be created or if there is an SQL
/// error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    create_transaction_table(connection)?;

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Indexes used by the date-range and category filters.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category);",
        (),
    )?;

    Ok(())
}
