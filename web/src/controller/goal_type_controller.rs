use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::goal::{TypeIndexParams, TypeUpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{goal_type as GoalTypeApi, goal_types::Model, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/goal_types",
    params(
        ApiVersion,
        ("goal_category_id" = Option<Uuid>, Query, description = "Only types of this category")
    ),
    responses(
        (status = 200, description = "Goal Types ordered by name", body = [domain::goal_types::Model]),
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
    Query(params): Query<TypeIndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Goal Types: {params:?}");

    let types = GoalTypeApi::find_by_category(app_state.db_conn_ref(), params.goal_category_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), types)))
}

#[utoipa::path(
    post,
    path = "/goal_types",
    params(ApiVersion),
    request_body = domain::goal_types::Model,
    responses(
        (status = 201, description = "Successfully Created a Goal Type", body = [domain::goal_types::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal Category not found"),
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
    Json(type_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Goal Type from: {type_model:?}");

    let goal_type = GoalTypeApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        type_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), goal_type)))
}

#[utoipa::path(
    get,
    path = "/goal_types/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Goal Type id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Goal Type", body = [domain::goal_types::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal Type not found")
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
    let goal_type = GoalTypeApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), goal_type)))
}

#[utoipa::path(
    put,
    path = "/goal_types/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of goal type to update"),
    ),
    request_body = crate::params::goal::TypeUpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Goal Type", body = [domain::goal_types::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal Type not found"),
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
    Json(params): Json<TypeUpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Goal Type {id} with params: {params:?}");
    params.validate()?;

    let goal_type = GoalTypeApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), goal_type)))
}

#[utoipa::path(
    delete,
    path = "/goal_types/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of goal type to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted Goal Type"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal Type not found"),
        (status = 409, description = "Goals still use this type")
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
    debug!("DELETE Goal Type by id: {id}");

    GoalTypeApi::delete(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), json!({"id": id}))))
}
