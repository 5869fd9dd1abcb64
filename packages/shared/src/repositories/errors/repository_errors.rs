const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryError {
    NotFound,
    Conflict(String),
    Timeout,
    TransactionClosed,
    Database(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound)
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_))
    }
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound => write!(f, "Record not found"),
            RepositoryError::Conflict(msg) => write!(f, "Conflicting record: {}", msg),
            RepositoryError::Timeout => write!(f, "Database call timed out"),
            RepositoryError::TransactionClosed => {
                write!(f, "Transaction was already committed or rolled back")
            }
            RepositoryError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound,
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                let constraint = db_err.constraint().unwrap_or("unique constraint");
                RepositoryError::Conflict(constraint.to_string())
            }
            sqlx::Error::PoolTimedOut => RepositoryError::Timeout,
            other => RepositoryError::Database(other.to_string()),
        }
    }
}
