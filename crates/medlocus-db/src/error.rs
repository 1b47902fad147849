//! # Storage Errors
//!
//! `DbError` classifies what went wrong below the repositories so the API
//! can pick a status without parsing messages.
//!
//! ```text
//! sqlx::Error ───────────────┐
//!   constraint text          ├──► DbError ──► ApiError (apps/api)
//!   pool / io / lock         │      ▲
//! CoreError (stock, refs) ───┘──────┘ Domain
//! ```

use medlocus_core::CoreError;
use thiserror::Error;

/// Failures of a repository call.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id.
    ///
    /// ## When This Occurs
    /// - Update or delete matched zero rows
    /// - A row vanished between write and read-back
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write.
    #[error("{field} must be unique, '{value}' is taken")]
    UniqueViolation { field: String, value: String },

    /// A REFERENCES clause rejected the write.
    ///
    /// ## When This Occurs
    /// - Deleting a medicine that sale items still reference
    /// - Referencing a supplier or customer that does not exist
    #[error("Reference check failed: {message}")]
    ForeignKeyViolation { message: String },

    /// The database file could not be opened or the pool is closed.
    #[error("Database unavailable: {0}")]
    ConnectionFailed(String),

    /// An embedded migration did not apply.
    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for any other reason.
    #[error("Statement failed: {0}")]
    QueryFailed(String),

    /// A transaction could not begin or commit.
    ///
    /// ## When This Occurs
    /// - Another writer held the database lock past `busy_timeout`
    #[error("Transaction aborted: {0}")]
    TransactionFailed(String),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("No database connection available")]
    PoolExhausted,

    /// Anything sqlx reports that has no better category.
    #[error("Unexpected database error: {0}")]
    Internal(String),

    /// A business rule rejected the operation (stock, missing references).
    #[error(transparent)]
    Domain(#[from] CoreError),
}

impl DbError {
    /// `NotFound` for `entity` with the given id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Whether storage itself is unreachable or saturated, as opposed to
    /// the request being wrong.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionFailed(_) | DbError::PoolExhausted | DbError::TransactionFailed(_)
        )
    }

    /// Replaces a foreign key violation with a domain error.
    ///
    /// SQLite does not say which reference failed, so callers that insert
    /// exactly one optional reference use this to name it.
    pub(crate) fn on_foreign_key(self, domain: CoreError) -> Self {
        match self {
            DbError::ForeignKeyViolation { .. } => DbError::Domain(domain),
            other => other,
        }
    }
}

/// Classifies sqlx failures.
///
/// ```text
/// RowNotFound                       → NotFound
/// "UNIQUE constraint failed: t.c"   → UniqueViolation { field: "t.c" }
/// "FOREIGN KEY constraint failed"   → ForeignKeyViolation
/// "database is locked" / "busy"     → TransactionFailed
/// PoolTimedOut                      → PoolExhausted
/// PoolClosed, Io                    → ConnectionFailed
/// anything else                     → QueryFailed / Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message();

                if let Some(column) = message.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: column.to_string(),
                        value: "?".to_string(),
                    }
                } else if message.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: message.to_string(),
                    }
                } else if message.contains("database is locked") || message.contains("database is busy") {
                    DbError::TransactionFailed(message.to_string())
                } else {
                    DbError::QueryFailed(message.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_classification() {
        assert!(DbError::PoolExhausted.is_unavailable());
        assert!(DbError::ConnectionFailed("gone".into()).is_unavailable());
        assert!(DbError::TransactionFailed("database is locked".into()).is_unavailable());
        assert!(!DbError::not_found("Sale", 4).is_unavailable());
        assert!(!DbError::QueryFailed("syntax".into()).is_unavailable());
    }

    #[test]
    fn test_pool_errors_map() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_foreign_key_replacement() {
        let err = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".into(),
        }
        .on_foreign_key(CoreError::CustomerNotFound(9));
        assert!(matches!(
            err,
            DbError::Domain(CoreError::CustomerNotFound(9))
        ));

        let err = DbError::PoolExhausted.on_foreign_key(CoreError::CustomerNotFound(9));
        assert!(matches!(err, DbError::PoolExhausted));
    }

    #[test]
    fn test_domain_message_passthrough() {
        let err: DbError = CoreError::SaleNotFound(3).into();
        assert_eq!(err.to_string(), "Sale not found: 3");
    }
}
