/// Error types for the storage and service layers

use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Record not found")]
    NotFound,

    #[error("Email already exists")]
    EmailExists,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Query execution error: {0}")]
    Query(String),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                let unique = db_err.is_unique_violation()
                    || message.contains("UNIQUE constraint failed");
                if unique && message.contains("email") {
                    DbError::EmailExists
                } else if unique
                    || db_err.is_foreign_key_violation()
                    || message.contains("constraint failed")
                {
                    DbError::Constraint(message)
                } else {
                    DbError::Query(message)
                }
            }
            _ => DbError::Query(err.to_string()),
        }
    }
}

/// Failures surfaced by the domain services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad or missing input, mismatched confirmation, duplicate email
    #[error("{0}")]
    Validation(String),

    /// Unknown id or email
    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(DbError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

pub const MSG_EMAIL_NOT_CONFIRMED: &str = "Email availability has not been confirmed";
pub const MSG_DUPLICATE_EMAIL: &str = "Email is already in use";
pub const MSG_PASSWORD_MISMATCH: &str = "Password and confirmation do not match";
pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_COURSE_NOT_FOUND: &str = "Course not found";

impl From<DbError> for ServiceError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::EmailExists => ServiceError::Validation(MSG_DUPLICATE_EMAIL.to_string()),
            other => ServiceError::Database(other),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        DbError::from(err).into()
    }
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
