use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::win::{IndexParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{win as WinApi, wins::Model, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;
use validator::Validate;

/// GET the Wins of a Client, most recent first.
#[utoipa::path(
    get,
    path = "/wins",
    params(
        ApiVersion,
        ("client_id" = Uuid, Query, description = "Client whose wins to list")
    ),
    responses(
        (status = 200, description = "Wins of the client", body = [domain::wins::Model]),
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
    debug!("GET Wins for client {}", params.client_id);

    let wins = WinApi::find_by_client(app_state.db_conn_ref(), params.client_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), wins)))
}

#[utoipa::path(
    post,
    path = "/wins",
    params(ApiVersion),
    request_body = domain::wins::Model,
    responses(
        (status = 201, description = "Successfully recorded a Win", body = [domain::wins::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Client not found"),
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
    Json(win_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Win from: {win_model:?}");

    let win = WinApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        win_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), win)))
}

#[utoipa::path(
    get,
    path = "/wins/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Win id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Win", body = [domain::wins::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Win not found")
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
    let win = WinApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), win)))
}

#[utoipa::path(
    put,
    path = "/wins/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of win to update"),
    ),
    request_body = crate::params::win::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Win", body = [domain::wins::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Win not found"),
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
    debug!("PUT Update Win {id} with params: {params:?}");
    params.validate()?;

    let win = WinApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), win)))
}

#[utoipa::path(
    delete,
    path = "/wins/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of win to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted Win"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Win not found")
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
    debug!("DELETE Win by id: {id}");

    WinApi::delete(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), json!({"id": id}))))
}
