use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::coach::{IndexParams, SortField, UpdateParams};
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::table::{FacetQuery, TableQuery};
use domain::{coach as CoachApi, coach_payment as CoachPaymentApi, coaches::Model, Id};
use log::*;
use service::config::ApiVersion;
use validator::Validate;

/// POST create a new Coach
#[utoipa::path(
    post,
    path = "/coaches",
    params(ApiVersion),
    request_body = domain::coaches::Model,
    responses(
        (status = 201, description = "Successfully Created a New Coach", body = [domain::coaches::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A coach with this email already exists"),
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
    Json(coach_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Coach from: {coach_model:?}");

    let coach = CoachApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        coach_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), coach)))
}

#[utoipa::path(
    get,
    path = "/coaches/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Coach id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Coach", body = [domain::coaches::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coach not found")
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
    debug!("GET Coach by id: {id}");

    let coach = CoachApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coach)))
}

#[utoipa::path(
    get,
    path = "/coaches",
    params(
        ApiVersion,
        ("coach_team_id" = Option<Uuid>, Query, description = "Filter by team"),
        ("user_id" = Option<Uuid>, Query, description = "Filter by linked user account"),
        ("is_active" = Option<bool>, Query, description = "Filter by soft-delete flag"),
        ("sort_by" = Option<crate::params::coach::SortField>, Query, description = "Sort by field. Valid values: 'last_name', 'created_at'.", example = "last_name"),
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort order. Valid values: 'asc' (ascending), 'desc' (descending).", example = "asc")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all matching Coaches", body = [domain::coaches::Model]),
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
    debug!("GET all Coaches, filter params: {params:?}");

    let mut params = params;
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        SortField::LastName,
    );

    let coaches = CoachApi::find_by(app_state.db_conn_ref(), params).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coaches)))
}

#[utoipa::path(
    put,
    path = "/coaches/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of coach to update"),
    ),
    request_body = crate::params::coach::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Coach", body = [domain::coaches::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coach not found"),
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
    debug!("PUT Update Coach {id} with params: {params:?}");
    params.validate()?;

    let coach = CoachApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coach)))
}

#[utoipa::path(
    delete,
    path = "/coaches/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of coach to deactivate"),
    ),
    responses(
        (status = 200, description = "Successfully deactivated Coach", body = [domain::coaches::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Coach not found")
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
    debug!("DELETE Coach by id: {id}");

    let coach = CoachApi::deactivate(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coach)))
}

/// GET paid, pending and total payout amounts for a Coach.
#[utoipa::path(
    get,
    path = "/coaches/{id}/payment_summary",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Coach id"),
    ),
    responses(
        (status = 200, description = "Payout totals for the coach", body = [domain::coach_payment::CoachPaymentSummary]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn payment_summary(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET payment summary for Coach {id}");

    let summary = CoachPaymentApi::summary(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), summary)))
}

#[utoipa::path(
    post,
    path = "/coaches/table",
    params(ApiVersion),
    request_body = domain::table::TableQuery,
    responses(
        (status = 200, description = "One filtered, sorted page of Coaches with the total row count"),
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
    debug!("POST Coaches table query: {query:?}");

    let page = CoachApi::table(app_state.db_conn_ref(), &query, app_state.page_bounds()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), page)))
}

#[utoipa::path(
    post,
    path = "/coaches/facets",
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
    let facets = CoachApi::facets(app_state.db_conn_ref(), &query).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), facets)))
}
