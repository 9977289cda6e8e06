use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::goal::CategoryUpdateParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{goal_categories::Model, goal_category as GoalCategoryApi, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/goal_categories",
    params(ApiVersion),
    responses(
        (status = 200, description = "All Goal Categories ordered by name", body = [domain::goal_categories::Model]),
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
) -> Result<impl IntoResponse, Error> {
    let categories = GoalCategoryApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), categories)))
}

#[utoipa::path(
    post,
    path = "/goal_categories",
    params(ApiVersion),
    request_body = domain::goal_categories::Model,
    responses(
        (status = 201, description = "Successfully Created a Goal Category", body = [domain::goal_categories::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A category with this name already exists"),
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
    Json(category_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Goal Category from: {category_model:?}");

    let category = GoalCategoryApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        category_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), category)))
}

#[utoipa::path(
    get,
    path = "/goal_categories/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Goal Category id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Goal Category", body = [domain::goal_categories::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal Category not found")
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
    let category = GoalCategoryApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), category)))
}

#[utoipa::path(
    put,
    path = "/goal_categories/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of goal category to update"),
    ),
    request_body = crate::params::goal::CategoryUpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Goal Category", body = [domain::goal_categories::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal Category not found"),
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
    Json(params): Json<CategoryUpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Goal Category {id} with params: {params:?}");
    params.validate()?;

    let category = GoalCategoryApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), category)))
}

/// DELETE a Goal Category that no goal type refers to anymore.
#[utoipa::path(
    delete,
    path = "/goal_categories/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of goal category to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted Goal Category"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal Category not found"),
        (status = 409, description = "Goal types still use this category")
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
    debug!("DELETE Goal Category by id: {id}");

    GoalCategoryApi::delete(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), json!({"id": id}))))
}
