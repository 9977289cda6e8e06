use crate::controller::{fill_default_currency, ApiResponse};
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::payment::{IndexParams, SortField};
use crate::params::sort::SortOrder;
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::table::{FacetQuery, TableQuery};
use domain::{payment as PaymentApi, payments::Model, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;

/// POST record money received from a Client.
///
/// When the payment references a slot, the slot is settled once the payments
/// applied to it cover its amount.
#[utoipa::path(
    post,
    path = "/payments",
    params(ApiVersion),
    request_body = domain::payments::Model,
    responses(
        (status = 201, description = "Successfully recorded the Payment", body = [domain::payment::RecordedPayment]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Referenced client, plan or slot not found"),
        (status = 422, description = "Unprocessable Entity")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn record(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(mut payment_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Record a Payment from: {payment_model:?}");
    fill_default_currency(&mut payment_model.currency, &app_state);

    let recorded = PaymentApi::record(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        payment_model,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), recorded)))
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Payment id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Payment", body = [domain::payments::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment not found")
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
    debug!("GET Payment by id: {id}");

    let payment = PaymentApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), payment)))
}

#[utoipa::path(
    get,
    path = "/payments",
    params(
        ApiVersion,
        ("client_id" = Option<Uuid>, Query, description = "Filter by client"),
        ("payment_plan_id" = Option<Uuid>, Query, description = "Filter by payment plan"),
        ("payment_slot_id" = Option<Uuid>, Query, description = "Filter by payment slot"),
        ("method" = Option<domain::payment_method::PaymentMethod>, Query, description = "Filter by payment method"),
        ("sort_by" = Option<crate::params::payment::SortField>, Query, description = "Sort by field. Valid values: 'paid_at', 'amount_cents'.", example = "paid_at"),
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort order. Valid values: 'asc' (ascending), 'desc' (descending).", example = "desc")
    ),
    responses(
        (status = 200, description = "Successfully retrieved Payments", body = [domain::payments::Model]),
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
    debug!("GET all Payments, filter params: {params:?}");

    // Most recent payments first unless the caller asks otherwise
    let mut params = params;
    if params.sort_by.is_none() && params.sort_order.is_none() {
        params.sort_order = Some(SortOrder::Desc);
    }
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        SortField::PaidAt,
    );

    let payments = PaymentApi::find_by(app_state.db_conn_ref(), params).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), payments)))
}

/// DELETE a Payment recorded in error. Slots it settled keep their status.
#[utoipa::path(
    delete,
    path = "/payments/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of payment to delete"),
    ),
    responses(
        (status = 200, description = "Successfully deleted Payment"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment not found")
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
    debug!("DELETE Payment by id: {id}");

    PaymentApi::delete(
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
    path = "/payments/table",
    params(ApiVersion),
    request_body = domain::table::TableQuery,
    responses(
        (status = 200, description = "One filtered, sorted page of Payments with the total row count"),
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
    debug!("POST Payments table query: {query:?}");

    let page = PaymentApi::table(app_state.db_conn_ref(), &query, app_state.page_bounds()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), page)))
}

#[utoipa::path(
    post,
    path = "/payments/facets",
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
    let facets = PaymentApi::facets(app_state.db_conn_ref(), &query).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), facets)))
}
