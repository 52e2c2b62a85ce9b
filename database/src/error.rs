use thiserror::Error;

/// Failures surfaced by [`crate::client::ExplorerDbClient`], split by whether a connection could be used at all
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl DbError {
    pub fn is_connection(&self) -> bool {
        matches!(self, DbError::Connection(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_) => DbError::Connection(error),
            _ => DbError::Query(error),
        }
    }
}
