use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::coach_team::{IndexParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{coach_team as CoachTeamApi, coach_teams::Model, Id};
use log::*;
use service::config::ApiVersion;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/coach_teams",
    params(
        ApiVersion,
        ("include_inactive" = Option<bool>, Query, description = "Also list deactivated teams")
    ),
    responses(
        (status = 200, description = "Successfully retrieved Coach Teams", body = [domain::coach_teams::Model]),
        (status = 401, description = "Unauthorized")
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
    debug!("GET all Coach Teams: {params:?}");

    let teams = CoachTeamApi::find_all(app_state.db_conn_ref(), params.include_inactive).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), teams)))
}

#[utoipa::path(
    post,
    path = "/coach_teams",
    params(ApiVersion),
    request_body = domain::coach_teams::Model,
    responses(
        (status = 201, description = "Successfully Created a New Coach Team", body = [domain::coach_teams::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A team with this name already exists"),
        (status = 422, description = "Unprocessable Entity")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(team_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Coach Team from: {team_model:?}");

    let team = CoachTeamApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        team_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), team)))
}

/// GET a Coach Team with its member and active client counts.
#[utoipa::path(
    get,
    path = "/coach_teams/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Coach Team id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Coach Team summary", body = [domain::coach_team::CoachTeamSummary]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coach Team not found")
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
    debug!("GET Coach Team by id: {id}");

    let summary = CoachTeamApi::summary(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), summary)))
}

#[utoipa::path(
    get,
    path = "/coach_teams/{id}/members",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Coach Team id")
    ),
    responses(
        (status = 200, description = "Coaches belonging to the team", body = [domain::coaches::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coach Team not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn members(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET members of Coach Team {id}");

    let coaches = CoachTeamApi::members(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coaches)))
}

#[utoipa::path(
    put,
    path = "/coach_teams/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of coach team to update"),
    ),
    request_body = crate::params::coach_team::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Coach Team", body = [domain::coach_teams::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coach Team not found"),
        (status = 422, description = "Unprocessable Entity")
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
    debug!("PUT Update Coach Team {id} with params: {params:?}");
    params.validate()?;

    let team = CoachTeamApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), team)))
}

#[utoipa::path(
    delete,
    path = "/coach_teams/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of coach team to deactivate"),
    ),
    responses(
        (status = 200, description = "Successfully deactivated Coach Team", body = [domain::coach_teams::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coach Team not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn deactivate(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Coach Team by id: {id}");

    let team = CoachTeamApi::deactivate(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), team)))
}
