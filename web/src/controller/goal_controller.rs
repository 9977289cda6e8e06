use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::goal::{IndexParams, SortField, StatusParams, UpdateParams};
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::table::{FacetQuery, TableQuery};
use domain::{goal as GoalApi, goals::Model, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;
use validator::Validate;

/// POST create a new Goal for a Client
#[utoipa::path(
    post,
    path = "/goals",
    params(ApiVersion),
    request_body = domain::goals::Model,
    responses(
        (status = 201, description = "Successfully Created a New Goal", body = [domain::goals::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Client or Goal Type not found"),
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
    Json(goal_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Goal from: {goal_model:?}");

    let goal = GoalApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        goal_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), goal)))
}

#[utoipa::path(
    get,
    path = "/goals/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Goal id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Goal", body = [domain::goals::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal not found")
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
    debug!("GET Goal by id: {id}");

    let goal = GoalApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), goal)))
}

#[utoipa::path(
    get,
    path = "/goals",
    params(
        ApiVersion,
        ("client_id" = Option<Uuid>, Query, description = "Filter by client"),
        ("goal_type_id" = Option<Uuid>, Query, description = "Filter by goal type"),
        ("status" = Option<domain::goal_status::GoalStatus>, Query, description = "Filter by status"),
        ("sort_by" = Option<crate::params::goal::SortField>, Query, description = "Sort by field. Valid values: 'title', 'due_date', 'created_at'.", example = "due_date"),
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort order. Valid values: 'asc' (ascending), 'desc' (descending).", example = "asc")
    ),
    responses(
        (status = 200, description = "Successfully retrieved Goals", body = [domain::goals::Model]),
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
    debug!("GET all Goals, filter params: {params:?}");

    let mut params = params;
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        SortField::DueDate,
    );

    let goals = GoalApi::find_by(app_state.db_conn_ref(), params).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), goals)))
}

#[utoipa::path(
    put,
    path = "/goals/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of goal to update"),
    ),
    request_body = crate::params::goal::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Goal", body = [domain::goals::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal not found"),
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
    debug!("PUT Update Goal {id} with params: {params:?}");
    params.validate()?;

    let goal = GoalApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), goal)))
}

/// PUT moves a Goal to a new status. Completing it stamps `completed_at`.
#[utoipa::path(
    put,
    path = "/goals/{id}/status",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of goal to update"),
        ("value" = domain::goal_status::GoalStatus, Query, description = "New status")
    ),
    responses(
        (status = 200, description = "Successfully Updated Goal status", body = [domain::goals::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal not found")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn update_status(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Query(status): Query<StatusParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Goal {id} status to {:?}", status.value);

    let goal = GoalApi::update_status(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        status.value,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), goal)))
}

#[utoipa::path(
    delete,
    path = "/goals/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of goal to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted Goal"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Goal not found")
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
    debug!("DELETE Goal by id: {id}");

    GoalApi::delete(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), json!({"id": id}))))
}

#[utoipa::path(
    post,
    path = "/goals/table",
    params(ApiVersion),
    request_body = domain::table::TableQuery,
    responses(
        (status = 200, description = "One filtered, sorted page of Goals with the total row count"),
        (status = 401, description = "Unauthorized"),
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
    debug!("POST Goals table query: {query:?}");

    let page = GoalApi::table(app_state.db_conn_ref(), &query, app_state.page_bounds()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), page)))
}

#[utoipa::path(
    post,
    path = "/goals/facets",
    params(ApiVersion),
    request_body = domain::table::FacetQuery,
    responses(
        (status = 200, description = "Facet values for the requested columns", body = [domain::table::Facet]),
        (status = 401, description = "Unauthorized"),
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
    let facets = GoalApi::facets(app_state.db_conn_ref(), &query).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), facets)))
}
