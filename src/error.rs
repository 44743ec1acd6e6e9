//! Defines the app level error type.

/// The errors that may occur in the application.
///
/// Value-level data quality issues (a single unparseable date or amount) are
/// deliberately *not* represented here: aggregation and bulk import drop such
/// rows instead of raising. Only structural problems and store failures
/// surface as errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A date string could not be parsed as a calendar date.
    #[error("\"{0}\" is not a valid calendar date")]
    InvalidDate(String),

    /// An empty string was used for a transaction category.
    #[error("transaction category cannot be empty")]
    EmptyCategory,

    /// An amount was not a usable number.
    #[error("\"{0}\" cannot be used as a transaction amount")]
    InvalidAmount(String),

    /// The CSV data is missing a required column.
    ///
    /// Column matching is case-insensitive and accepts the synonyms listed in
    /// [crate::import], so this error means none of the accepted names were
    /// present in the header row.
    #[error("the CSV data is missing the required column \"{0}\"")]
    MissingColumn(&'static str),

    /// The CSV had issues that prevented it from being parsed.
    #[error("could not parse the CSV data: {0}")]
    InvalidCsv(String),

    /// A file could not be read from disk.
    #[error("could not read \"{0}\": {1}")]
    FileRead(String, String),

    /// The requested resource could not be found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not serialize a value as JSON.
    #[error("could not serialize as JSON: {0}")]
    JsonSerialization(String),

    /// The HTTP client for the model server could not be constructed.
    #[error("could not build the HTTP client: {0}")]
    HttpClient(String),

    /// A chat request to the model server failed.
    ///
    /// Callers should pass in the model name that was requested and the
    /// transport error as a string. This covers timeouts, refused
    /// connections, and models that are not installed on the server.
    #[error("request to model \"{0}\" failed: {1}")]
    ModelRequest(String, String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
