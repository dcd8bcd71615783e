//! Error types for the points ledger CLI.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while ingesting transactions or reporting balances.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: points-ledger <transactions.csv> [spend_amount]")]
    MissingArgument,

    /// Spend amount argument was not a non-negative integer
    #[error("Invalid spend amount '{0}': expected a non-negative integer")]
    InvalidSpendAmount(String),
}
