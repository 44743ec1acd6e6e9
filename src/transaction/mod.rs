//! The transaction store: data models, validation, and SQLite queries.

mod core;
mod query;

pub use self::core::{
    Transaction, TransactionBuilder, TransactionId, create_transaction, delete_all_transactions,
    delete_transaction, get_transaction, update_transaction,
};
pub use self::query::{
    StoreStats, TransactionFilter, bulk_import, distinct_categories, fetch_transactions,
    transaction_stats,
};

pub(crate) use self::core::map_transaction_row;
