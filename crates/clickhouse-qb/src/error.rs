//! Error types for clickhouse-qb

use crate::enums::Format;
use thiserror::Error;

/// Result type alias for builder and executor operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types raised while compiling or executing queries.
///
/// Structural variants are only ever returned by the compiler (`to_sql` and
/// friends). Fluent calls record state and never fail.
#[derive(Debug, Error)]
pub enum QbError {
    /// FROM section has no table or sub-query
    #[error("Missed table or subquery for 'FROM' section.")]
    MissingFrom,

    /// INSERT without a target table
    #[error("Missed table for insert statement.")]
    MissingInsertTable,

    /// DELETE without a WHERE section
    #[error("Missed where section for delete statement.")]
    MissingDeleteWhere,

    /// Join is missing one or more required segments
    #[error("Missed required segments for 'JOIN' section. Missed: {}", .missing.join(", "))]
    WrongJoin { missing: Vec<&'static str> },

    /// Join carries both USING and ON keys
    #[error("Ambiguous join keys: a join may use either USING or ON, not both.")]
    AmbiguousJoinKeys,

    /// Argument of the wrong kind passed to a fluent call
    #[error("{0}")]
    InvalidArgument(String),

    /// In-memory table requested for a file without structure
    #[error("No structure provided for insert in memory table")]
    NoTableStructure,

    /// Unknown output format name
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Unknown operator token
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Rows cannot be serialized in the requested format
    #[error("Format {0} is not supported for inserting rows")]
    UnsupportedInsertFormat(Format),

    /// Error reported by the executor
    #[error("Client error: {0}")]
    Client(String),

    /// Result rows could not be interpreted
    #[error("Decode error: {0}")]
    Decode(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),
}

impl QbError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a client error
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client(message.into())
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Check if this is a structural (compile-time) error
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MissingFrom
                | Self::MissingInsertTable
                | Self::MissingDeleteWhere
                | Self::WrongJoin { .. }
                | Self::AmbiguousJoinKeys
                | Self::InvalidArgument(_)
        )
    }

    /// Check if this is a join error
    pub fn is_join_error(&self) -> bool {
        matches!(self, Self::WrongJoin { .. } | Self::AmbiguousJoinKeys)
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
