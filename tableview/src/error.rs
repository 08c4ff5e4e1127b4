//! Error types

use thiserror::Error;

/// Errors raised while building a table or replacing its rows.
///
/// Interactive input never fails; misuse there is absorbed and logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two rows share a key.
    #[error("duplicate row key {key}")]
    DuplicateRowKey {
        /// Debug rendering of the offending key.
        key: String,
    },

    /// A single-selection table was seeded with several rows.
    #[error("single selection table seeded with {count} rows")]
    SelectionCardinality { count: usize },

    /// The initial sort truth names a column that does not exist.
    #[error("sort column {column_index} out of range for {column_count} columns")]
    UnknownSortColumn {
        column_index: usize,
        column_count: usize,
    },
}
