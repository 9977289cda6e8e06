use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::user::{AccessParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{user as UserApi, users::Model, Id};
use log::*;
use service::config::ApiVersion;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/users",
    params(ApiVersion),
    responses(
        (status = 200, description = "All back-office users", body = [domain::users::Model]),
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
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Users");

    let users = UserApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), users)))
}

/// POST create a back-office user. The password is hashed before it is stored.
#[utoipa::path(
    post,
    path = "/users",
    params(ApiVersion),
    request_body = domain::users::Model,
    responses(
        (status = 201, description = "Successfully Created a New User", body = [domain::users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "A user with this email already exists"),
        (status = 422, description = "Unprocessable Entity")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(user_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new User: {}", user_model.email);

    let user = UserApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        admin.id,
        user_model,
    )
    .await?;

    info!("User {} created by {}", user.id, admin.id);

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), user)))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "User id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a User", body = [domain::users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
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
    debug!("GET User by id: {id}");

    let user = UserApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), user)))
}

/// PUT updates a user's own profile (or any profile, for admins).
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of user to update"),
    ),
    request_body = crate::params::user::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated User", body = [domain::users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found"),
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
    debug!("PUT Update User {id}");
    params.validate()?;

    let updated = UserApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), updated)))
}

/// PUT changes a user's role or activation.
#[utoipa::path(
    put,
    path = "/users/{id}/access",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of user to update"),
    ),
    request_body = crate::params::user::AccessParams,
    responses(
        (status = 200, description = "Successfully Updated User access", body = [domain::users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "User not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update_access(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(admin): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<AccessParams>,
) -> Result<impl IntoResponse, Error> {
    info!("Admin {} changing access of user {id}: {params:?}", admin.id);

    let updated = UserApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        admin.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), updated)))
}
