use crate::controller::{fill_default_currency, ApiResponse};
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::payment_plan::{IndexParams, SortField, UpdateParams};
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::table::{FacetQuery, TableQuery};
use domain::{payment_plan as PaymentPlanApi, payment_plans::Model, Id};
use log::*;
use service::config::ApiVersion;
use validator::Validate;

/// POST create a Payment Plan. The installment slots are generated from the
/// plan's total, installment count, frequency and start date.
#[utoipa::path(
    post,
    path = "/payment_plans",
    params(ApiVersion),
    request_body = domain::payment_plans::Model,
    responses(
        (status = 201, description = "Successfully Created a Payment Plan with its slots", body = [domain::payment_plan::PaymentPlanWithSlots]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
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
    Json(mut plan_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Payment Plan from: {plan_model:?}");
    fill_default_currency(&mut plan_model.currency, &app_state);

    let plan = PaymentPlanApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        plan_model,
    )
    .await?;

    debug!(
        "New Payment Plan {} with {} slots",
        plan.plan.id,
        plan.slots.len()
    );

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), plan)))
}

/// GET a Payment Plan together with its slots ordered by due date.
#[utoipa::path(
    get,
    path = "/payment_plans/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Payment Plan id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Payment Plan", body = [domain::payment_plan::PaymentPlanWithSlots]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment Plan not found")
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
    debug!("GET Payment Plan by id: {id}");

    let plan = PaymentPlanApi::find_with_slots(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), plan)))
}

#[utoipa::path(
    get,
    path = "/payment_plans",
    params(
        ApiVersion,
        ("client_id" = Option<Uuid>, Query, description = "Filter by client"),
        ("is_active" = Option<bool>, Query, description = "Filter by soft-delete flag"),
        ("sort_by" = Option<crate::params::payment_plan::SortField>, Query, description = "Sort by field. Valid values: 'name', 'start_date', 'created_at'.", example = "start_date"),
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort order. Valid values: 'asc' (ascending), 'desc' (descending).", example = "asc")
    ),
    responses(
        (status = 200, description = "Successfully retrieved Payment Plans", body = [domain::payment_plans::Model]),
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
    debug!("GET all Payment Plans, filter params: {params:?}");

    let mut params = params;
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        SortField::StartDate,
    );

    let plans = PaymentPlanApi::find_by(app_state.db_conn_ref(), params).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), plans)))
}

/// PUT renames a Payment Plan. Amounts and schedule are fixed once slots exist.
#[utoipa::path(
    put,
    path = "/payment_plans/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of payment plan to update"),
    ),
    request_body = crate::params::payment_plan::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Payment Plan", body = [domain::payment_plans::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment Plan not found"),
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
    debug!("PUT Update Payment Plan {id} with params: {params:?}");
    params.validate()?;

    let plan = PaymentPlanApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), plan)))
}

#[utoipa::path(
    delete,
    path = "/payment_plans/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of payment plan to deactivate"),
    ),
    responses(
        (status = 200, description = "Successfully deactivated Payment Plan", body = [domain::payment_plans::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment Plan not found")
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
    debug!("DELETE Payment Plan by id: {id}");

    let plan = PaymentPlanApi::deactivate(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), plan)))
}

#[utoipa::path(
    post,
    path = "/payment_plans/table",
    params(ApiVersion),
    request_body = domain::table::TableQuery,
    responses(
        (status = 200, description = "One filtered, sorted page of Payment Plans with the total row count"),
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
    debug!("POST Payment Plans table query: {query:?}");

    let page =
        PaymentPlanApi::table(app_state.db_conn_ref(), &query, app_state.page_bounds()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), page)))
}

#[utoipa::path(
    post,
    path = "/payment_plans/facets",
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
    let facets = PaymentPlanApi::facets(app_state.db_conn_ref(), &query).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), facets)))
}
