//! Read-only access to the audit trail. Entries are written by the
//! `AuditLogHandler` subscribed to domain events, never through the API.
use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::audit_log::IndexParams;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::table::{FacetQuery, TableQuery};
use domain::{audit_log as AuditLogApi, Id};
use log::*;
use service::config::ApiVersion;

/// GET the history of one table, optionally narrowed to a single record.
#[utoipa::path(
    get,
    path = "/audit_logs",
    params(
        ApiVersion,
        ("table_name" = String, Query, description = "Table the audited records belong to"),
        ("record_id" = Option<Uuid>, Query, description = "Only entries for this record")
    ),
    responses(
        (status = 200, description = "Audit entries, newest first", body = [domain::audit_logs::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Audit Logs: {params:?}");

    let entries = AuditLogApi::find_by_record(
        app_state.db_conn_ref(),
        &params.table_name,
        params.record_id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), entries)))
}

#[utoipa::path(
    get,
    path = "/audit_logs/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Audit entry id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved an audit entry", body = [domain::audit_logs::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Audit entry not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn read(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let entry = AuditLogApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), entry)))
}

#[utoipa::path(
    post,
    path = "/audit_logs/table",
    params(ApiVersion),
    request_body = domain::table::TableQuery,
    responses(
        (status = 200, description = "One filtered, sorted page of audit entries with the total row count"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Unknown column or operator in the query")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn table(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(query): Json<TableQuery>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Audit Logs table query: {query:?}");

    let page =
        AuditLogApi::table(app_state.db_conn_ref(), &query, app_state.page_bounds()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), page)))
}

#[utoipa::path(
    post,
    path = "/audit_logs/facets",
    params(ApiVersion),
    request_body = domain::table::FacetQuery,
    responses(
        (status = 200, description = "Facet values for the requested columns", body = [domain::table::Facet]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "Unknown column in the query")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn facets(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Json(query): Json<FacetQuery>,
) -> Result<impl IntoResponse, Error> {
    let facets = AuditLogApi::facets(app_state.db_conn_ref(), &query).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), facets)))
}
