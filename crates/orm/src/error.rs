//! Error types for the ORM system
//!
//! Query and scan failures are fatal to the strategy that hit them and are
//! wrapped with context naming the query that failed. A missing associated
//! row is never an error here; lookups return `Option` instead.

use thiserror::Error;

/// ORM result type alias
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for ORM operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// Pool creation, connection acquisition or health check failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query could not be executed
    #[error("Query error: {0}")]
    Query(String),

    /// Row did not have the shape the mapping expected
    #[error("Scan error: {0}")]
    Scan(String),

    /// Row is missing a column the mapping asked for
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Invalid configuration or arguments
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Lower-level error annotated with the query or strategy it came from
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<OrmError>,
    },
}

impl OrmError {
    /// Wrap this error with a description of what was being attempted
    pub fn context(self, context: impl Into<String>) -> Self {
        OrmError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers removed
    pub fn root(&self) -> &OrmError {
        match self {
            OrmError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error came from reading a row rather than running a query
    pub fn is_scan(&self) -> bool {
        matches!(self.root(), OrmError::Scan(_) | OrmError::ColumnNotFound(_))
    }
}

impl From<sqlx::Error> for OrmError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnNotFound(column) => OrmError::ColumnNotFound(column),
            sqlx::Error::ColumnDecode { index, source } => {
                OrmError::Scan(format!("column {}: {}", index, source))
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => OrmError::Connection(err.to_string()),
            other => OrmError::Query(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_and_displays() {
        let err = OrmError::Query("relation \"orders\" does not exist".to_string())
            .context("failed to execute orders query")
            .context("naive strategy");

        assert_eq!(
            err.to_string(),
            "naive strategy: failed to execute orders query: Query error: relation \"orders\" does not exist"
        );
        assert!(matches!(err.root(), OrmError::Query(_)));
        assert!(!err.is_scan());
    }

    #[test]
    fn test_scan_errors_are_detected_through_context() {
        let err = OrmError::ColumnNotFound("detail_id".to_string()).context("failed to scan detail row");
        assert!(err.is_scan());

        let err = OrmError::Scan("expected integer".to_string());
        assert!(err.is_scan());
    }

    #[test]
    fn test_sqlx_errors_map_to_kinds() {
        let err: OrmError = sqlx::Error::ColumnNotFound("order_id".to_string()).into();
        assert!(matches!(err, OrmError::ColumnNotFound(ref c) if c == "order_id"));

        let err: OrmError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, OrmError::Connection(_)));

        let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset by peer");
        let err = OrmError::from(sqlx::Error::Io(reset)).context("query fetch failed");
        assert!(matches!(err.root(), OrmError::Connection(_)));
        assert!(err.to_string().contains("connection reset by peer"));

        let err: OrmError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, OrmError::Query(_)));
    }
}
