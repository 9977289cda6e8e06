use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::payment_slot::{IndexParams, MarkOverdueParams, StatusParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{payment_slot as PaymentSlotApi, Id};
use log::*;
use serde_json::json;
use service::config::ApiVersion;

#[utoipa::path(
    get,
    path = "/payment_slots",
    params(
        ApiVersion,
        ("payment_plan_id" = Uuid, Query, description = "Plan whose slots to list")
    ),
    responses(
        (status = 200, description = "Slots of the plan ordered by due date", body = [domain::payment_slots::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment Plan not found")
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
    debug!("GET Payment Slots for plan {}", params.payment_plan_id);

    let slots = PaymentSlotApi::find_by_plan(app_state.db_conn_ref(), params.payment_plan_id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), slots)))
}

#[utoipa::path(
    get,
    path = "/payment_slots/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Payment Slot id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a Payment Slot", body = [domain::payment_slots::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment Slot not found")
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
    debug!("GET Payment Slot by id: {id}");

    let slot = PaymentSlotApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), slot)))
}

/// PUT sets the status of a Payment Slot, e.g. waiving it.
#[utoipa::path(
    put,
    path = "/payment_slots/{id}/status",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of payment slot to update"),
        ("value" = domain::payment_slot_status::PaymentSlotStatus, Query, description = "New status")
    ),
    responses(
        (status = 200, description = "Successfully Updated Payment Slot", body = [domain::payment_slots::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment Slot not found"),
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
    debug!("PUT Update Payment Slot {id} status to {:?}", status.value);

    let slot = PaymentSlotApi::update_status(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        status.value,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), slot)))
}

/// POST flags every pending slot due before the given day as overdue.
#[utoipa::path(
    post,
    path = "/payment_slots/mark_overdue",
    params(
        ApiVersion,
        ("today" = Option<String>, Query, description = "Reference day (YYYY-MM-DD), defaults to today in UTC")
    ),
    responses(
        (status = 200, description = "Number of slots that became overdue"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn mark_overdue(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Query(params): Query<MarkOverdueParams>,
) -> Result<impl IntoResponse, Error> {
    let today = params
        .today
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    debug!("POST mark Payment Slots overdue before {today}");

    let updated = PaymentSlotApi::mark_overdue(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        today,
    )
    .await?;

    info!("Marked {updated} payment slots overdue");

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({ "updated": updated }),
    )))
}
