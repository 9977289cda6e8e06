use crate::extractors::RejectionType;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use log::*;
use service::config::ApiVersion;

/// The API version requested through the `x-version` header, once it is known
/// to be one this server exposes.
pub(crate) struct CompareApiVersion(pub String);

impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header_name = ApiVersion::field_name();

        let Some(value) = parts.headers.get(header_name) else {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Missing {header_name} header"),
            ));
        };

        let version = value
            .to_str()
            .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid {header_name} header")))?;

        if ApiVersion::is_supported(version) {
            Ok(CompareApiVersion(version.trim().to_string()))
        } else {
            debug!("Rejected request for unsupported API version {version}");
            Err((
                StatusCode::BAD_REQUEST,
                format!(
                    "Unsupported API version {version}, supported versions: {}",
                    ApiVersion::versions().join(", ")
                ),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<CompareApiVersion, RejectionType> {
        let mut builder = Request::builder().uri("/clients");
        if let Some(value) = header {
            builder = builder.header("x-version", value);
        }
        let (mut parts, _body) = builder.body(()).unwrap().into_parts();
        CompareApiVersion::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn accepts_a_supported_version() {
        let CompareApiVersion(version) = extract(Some("1.0.0")).await.unwrap();
        assert_eq!(version, "1.0.0");
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let (status, message) = extract(None).await.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Missing x-version header");
    }

    #[tokio::test]
    async fn rejects_unknown_versions() {
        let (status, _) = extract(Some("9.9.9")).await.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
