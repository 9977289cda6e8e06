use crate::controller::ApiResponse;
use crate::extractors::compare_api_version::CompareApiVersion;
use crate::params::finance::RangeParams;
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::finance as FinanceApi;
use log::*;
use service::config::ApiVersion;

/// GET the finance dashboard figures for an inclusive range of days.
///
/// Revenue combines mirrored billing charges with manually recorded payments;
/// MRR and active subscriptions reflect the current state of the mirror.
#[utoipa::path(
    get,
    path = "/finance/kpis",
    params(
        ApiVersion,
        ("start" = String, Query, description = "First day of the range (YYYY-MM-DD)"),
        ("end" = String, Query, description = "Last day of the range (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Finance KPIs for the range", body = [domain::finance::FinanceKpis]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "start is after end")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn kpis(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Query(range): Query<RangeParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Finance KPIs {range:?}");

    let kpis = FinanceApi::kpis(app_state.db_conn_ref(), range.start, range.end).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), kpis)))
}

/// GET revenue per calendar month, including months without any revenue.
#[utoipa::path(
    get,
    path = "/finance/monthly_revenue",
    params(
        ApiVersion,
        ("start" = String, Query, description = "First day of the range (YYYY-MM-DD)"),
        ("end" = String, Query, description = "Last day of the range (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "One entry per month in the range", body = [domain::finance::MonthlyRevenue]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 422, description = "start is after end")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn monthly_revenue(
    CompareApiVersion(_v): CompareApiVersion,
    State(app_state): State<AppState>,
    Query(range): Query<RangeParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET monthly revenue {range:?}");

    let series =
        FinanceApi::monthly_revenue(app_state.db_conn_ref(), range.start, range.end).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), series)))
}
