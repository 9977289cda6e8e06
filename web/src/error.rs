use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{}", self.0)
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Validation(message) => {
                debug!("Rejected request input: {message}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "status_code": StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                        "error": message,
                    })),
                )
                    .into_response()
            }
            DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)) => {
                match entity_error_kind {
                    EntityErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT FOUND").into_response(),
                    EntityErrorKind::Invalid => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
                    }
                    EntityErrorKind::Unauthenticated => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
                    }
                    EntityErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT").into_response(),
                    EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => {
                        error!("Entity layer failure: {:?}", self.0.source);
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                    }
                }
            }
            DomainErrorKind::Internal(internal_error_kind) => {
                error!("Internal failure {internal_error_kind:?}: {:?}", self.0.source);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn entity_error(kind: EntityErrorKind) -> Error {
        Error(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(kind)),
        })
    }

    #[test]
    fn entity_errors_map_to_status_codes() {
        assert_eq!(
            entity_error(EntityErrorKind::NotFound).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            entity_error(EntityErrorKind::Invalid).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            entity_error(EntityErrorKind::Unauthenticated)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            entity_error(EntityErrorKind::Conflict).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            entity_error(EntityErrorKind::DbTransaction)
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn config_errors_are_internal_server_errors() {
        let err = Error(DomainError {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        });
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn validation_errors_return_their_message_as_json() {
        let err: Error = DomainError::validation("amount_cents: must be positive").into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({"status_code": 422, "error": "amount_cents: must be positive"})
        );
    }
}
