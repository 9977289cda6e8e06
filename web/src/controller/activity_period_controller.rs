use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::activity_period::{EndParams, IndexParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::Error as DomainError;
use domain::{client_activity_period as ActivityPeriodApi, client_activity_periods::Model, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;

/// GET activity periods by client, by coach, or those running on a given day.
#[utoipa::path(
    get,
    path = "/client_activity_periods",
    params(
        ApiVersion,
        ("client_id" = Option<Uuid>, Query, description = "Periods of this client"),
        ("coach_id" = Option<Uuid>, Query, description = "Periods served by this coach"),
        ("active_on" = Option<String>, Query, description = "Periods running on this day (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Matching Activity Periods", body = [domain::client_activity_periods::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "No selector given")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn index(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Activity Periods: {params:?}");
    let db = app_state.db_conn_ref();

    let periods = match params {
        IndexParams {
            client_id: Some(client_id),
            ..
        } => ActivityPeriodApi::find_by_client(db, client_id).await?,
        IndexParams {
            coach_id: Some(coach_id),
            ..
        } => ActivityPeriodApi::find_by_coach(db, coach_id).await?,
        IndexParams {
            active_on: Some(day),
            ..
        } => ActivityPeriodApi::find_active_on(db, day).await?,
        _ => {
            return Err(DomainError::validation(
                "one of client_id, coach_id or active_on is required",
            )
            .into())
        }
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), periods)))
}

/// POST opens an Activity Period. Periods of one client may not overlap.
#[utoipa::path(
    post,
    path = "/client_activity_periods",
    params(ApiVersion),
    request_body = domain::client_activity_periods::Model,
    responses(
        (status = 201, description = "Successfully Created an Activity Period", body = [domain::client_activity_periods::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Invalid dates, unknown client or coach, or overlaps another period of the client")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(period_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Activity Period from: {period_model:?}");

    let period = ActivityPeriodApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        period_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), period)))
}

#[utoipa::path(
    get,
    path = "/client_activity_periods/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Activity Period id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved an Activity Period", body = [domain::client_activity_periods::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Activity Period not found")
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
    debug!("GET Activity Period by id: {id}");

    let period = ActivityPeriodApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), period)))
}

#[utoipa::path(
    put,
    path = "/client_activity_periods/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of activity period to update"),
    ),
    request_body = crate::params::activity_period::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Activity Period", body = [domain::client_activity_periods::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Activity Period not found"),
        (status = 422, description = "Invalid dates, unknown client or coach, or overlaps another period of the client")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Activity Period {id} with params: {params:?}");

    let period = ActivityPeriodApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), period)))
}

/// PUT closes an Activity Period on the given day.
#[utoipa::path(
    put,
    path = "/client_activity_periods/{id}/end",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of activity period to end"),
        ("end_date" = String, Query, description = "Last day of the period (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Successfully ended Activity Period", body = [domain::client_activity_periods::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Activity Period not found"),
        (status = 422, description = "End date before start date, or overlaps another period of the client")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn end(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Query(params): Query<EndParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT End Activity Period {id} on {}", params.end_date);

    let period = ActivityPeriodApi::end(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params.end_date,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), period)))
}

#[utoipa::path(
    delete,
    path = "/client_activity_periods/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of activity period to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted Activity Period"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Activity Period not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn delete(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Activity Period by id: {id}");

    ActivityPeriodApi::delete(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), json!({"id": id}))))
}
