use crate::controller::{fill_default_currency, ApiResponse};
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::coach_payment::{IndexParams, SortField, StatusParams, UpdateParams};
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::table::{FacetQuery, TableQuery};
use domain::{coach_payment as CoachPaymentApi, coach_payments::Model, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/coach_payments",
    params(ApiVersion),
    request_body = domain::coach_payments::Model,
    responses(
        (status = 201, description = "Successfully Created a Coach Payment", body = [domain::coach_payments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Coach not found"),
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
    Json(mut coach_payment_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Coach Payment from: {coach_payment_model:?}");
    fill_default_currency(&mut coach_payment_model.currency, &app_state);

    let coach_payment = CoachPaymentApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        coach_payment_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(
        StatusCode::CREATED.into(),
        coach_payment,
    )))
}

#[utoipa::path(
    get,
    path = "/coach_payments/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Coach Payment id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Coach Payment", body = [domain::coach_payments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Coach Payment not found")
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
    debug!("GET Coach Payment by id: {id}");

    let coach_payment = CoachPaymentApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coach_payment)))
}

#[utoipa::path(
    get,
    path = "/coach_payments",
    params(
        ApiVersion,
        ("coach_id" = Option<Uuid>, Query, description = "Filter by coach"),
        ("client_id" = Option<Uuid>, Query, description = "Filter by client"),
        ("status" = Option<domain::coach_payment_status::CoachPaymentStatus>, Query, description = "Filter by payout status"),
        ("sort_by" = Option<crate::params::coach_payment::SortField>, Query, description = "Sort by field. Valid values: 'period_start', 'period_end', 'amount_cents'.", example = "period_end"),
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort order. Valid values: 'asc' (ascending), 'desc' (descending).", example = "desc")
    ),
    responses(
        (status = 200, description = "Successfully retrieved Coach Payments", body = [domain::coach_payments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
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
    debug!("GET all Coach Payments, filter params: {params:?}");

    let mut params = params;
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        SortField::PeriodEnd,
    );

    let coach_payments = CoachPaymentApi::find_by(app_state.db_conn_ref(), params).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coach_payments)))
}

#[utoipa::path(
    put,
    path = "/coach_payments/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of coach payment to update"),
    ),
    request_body = crate::params::coach_payment::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Coach Payment", body = [domain::coach_payments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Coach Payment not found"),
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
    debug!("PUT Update Coach Payment {id} with params: {params:?}");
    params.validate()?;

    let coach_payment = CoachPaymentApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coach_payment)))
}

/// PUT moves a Coach Payment to a new status. Marking it paid stamps `paid_at`.
#[utoipa::path(
    put,
    path = "/coach_payments/{id}/status",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of coach payment to update"),
        ("value" = domain::coach_payment_status::CoachPaymentStatus, Query, description = "New status")
    ),
    responses(
        (status = 200, description = "Successfully Updated Coach Payment status", body = [domain::coach_payments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Coach Payment not found"),
        (status = 422, description = "Status transition not allowed")
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
    debug!("PUT Update Coach Payment {id} status to {:?}", status.value);

    let coach_payment = CoachPaymentApi::update_status(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        status.value,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), coach_payment)))
}

#[utoipa::path(
    delete,
    path = "/coach_payments/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of coach payment to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted Coach Payment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Coach Payment not found"),
        (status = 422, description = "Paid coach payments cannot be deleted")
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
    debug!("DELETE Coach Payment by id: {id}");

    CoachPaymentApi::delete(
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
    path = "/coach_payments/table",
    params(ApiVersion),
    request_body = domain::table::TableQuery,
    responses(
        (status = 200, description = "One filtered, sorted page of Coach Payments with the total row count"),
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
    debug!("POST Coach Payments table query: {query:?}");

    let page =
        CoachPaymentApi::table(app_state.db_conn_ref(), &query, app_state.page_bounds()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), page)))
}

#[utoipa::path(
    post,
    path = "/coach_payments/facets",
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
    let facets = CoachPaymentApi::facets(app_state.db_conn_ref(), &query).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), facets)))
}
