//! Localbudget is a local-first personal finance toolkit.
//!
//! It keeps every transaction in an embedded SQLite database, computes
//! category and monthly spending aggregates with pure functions, imports CSV
//! statements with flexible column matching, and answers natural-language
//! questions about spending by handing locally computed context to an Ollama
//! chat model with a static two-model fallback.

#![warn(missing_docs)]

mod error;

pub mod aggregate;
pub mod assistant;
pub mod db;
pub mod import;
pub mod transaction;

pub use error::Error;
