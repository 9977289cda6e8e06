//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::{DbErr, SqlErr};

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex DbError::RecordNotFound
///  * Errors related to interactions with the database itself. Ex DbError::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Invalid search term, unknown table column or unsupported filter operator
    InvalidQueryTerm,
    // Record not found
    RecordNotFound,
    // Record not updated
    RecordNotUpdated,
    // Record not authenticated
    RecordUnauthenticated,
    // A unique constraint rejected the write
    RecordConflict,
    // A referenced record does not exist
    ForeignKeyViolation,
    // Errors related to interactions with the database itself. Ex DbError::Conn
    SystemError,
    // Validation error
    ValidationError,
    // Other errors
    Other,
}

impl Error {
    pub fn new(error_kind: EntityApiErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }

    pub fn not_found() -> Self {
        Self::new(EntityApiErrorKind::RecordNotFound)
    }

    pub fn invalid_query_term() -> Self {
        Self::new(EntityApiErrorKind::InvalidQueryTerm)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity API Error: {:?}", self)
    }
}

impl StdError for Error {}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        let error_kind = match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => EntityApiErrorKind::RecordConflict,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                EntityApiErrorKind::ForeignKeyViolation
            }
            _ => match err {
                DbErr::RecordNotFound(_) => EntityApiErrorKind::RecordNotFound,
                DbErr::RecordNotUpdated => EntityApiErrorKind::RecordNotUpdated,
                DbErr::ConnectionAcquire(_) | DbErr::Conn(_) | DbErr::Exec(_) => {
                    EntityApiErrorKind::SystemError
                }
                _ => EntityApiErrorKind::SystemError,
            },
        };

        Error {
            source: Some(err),
            error_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_not_found_maps_to_record_not_found() {
        let error: Error = DbErr::RecordNotFound("clients".to_string()).into();
        assert_eq!(error.error_kind, EntityApiErrorKind::RecordNotFound);
        assert!(error.source.is_some());
    }

    #[test]
    fn record_not_updated_maps_to_record_not_updated() {
        let error: Error = DbErr::RecordNotUpdated.into();
        assert_eq!(error.error_kind, EntityApiErrorKind::RecordNotUpdated);
    }

    #[test]
    fn custom_errors_map_to_system_error() {
        let error: Error = DbErr::Custom("boom".to_string()).into();
        assert_eq!(error.error_kind, EntityApiErrorKind::SystemError);
    }
}
