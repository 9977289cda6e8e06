use crate::controller::ApiResponse;
use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::client::{IndexParams, SortField, UpdateParams};
use crate::params::WithSortDefaults;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::table::{FacetQuery, TableQuery};
use domain::{client as ClientApi, clients::Model, Id};
use log::*;
use service::config::ApiVersion;
use validator::Validate;

/// POST create a new Client
#[utoipa::path(
    post,
    path = "/clients",
    params(ApiVersion),
    request_body = domain::clients::Model,
    responses(
        (status = 201, description = "Successfully Created a New Client", body = [domain::clients::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A client with this email already exists"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn create(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(client_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a new Client from: {client_model:?}");

    let client = ClientApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        client_model,
    )
    .await?;

    debug!("New Client: {client:?}");

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), client)))
}

/// GET a particular Client specified by its id.
#[utoipa::path(
    get,
    path = "/clients/{id}",
    params(
        ApiVersion,
        ("id" = String, Path, description = "Client id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Client by its id", body = [domain::clients::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Client not found"),
        (status = 405, description = "Method not allowed")
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
    debug!("GET Client by id: {id}");

    let client = ClientApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), client)))
}

#[utoipa::path(
    get,
    path = "/clients",
    params(
        ApiVersion,
        ("coach_id" = Option<Uuid>, Query, description = "Filter by assigned coach"),
        ("status" = Option<domain::client_status::ClientStatus>, Query, description = "Filter by lifecycle status"),
        ("is_active" = Option<bool>, Query, description = "Filter by soft-delete flag"),
        ("sort_by" = Option<crate::params::client::SortField>, Query, description = "Sort by field. Valid values: 'last_name', 'created_at', 'updated_at'.", example = "last_name"),
        ("sort_order" = Option<crate::params::sort::SortOrder>, Query, description = "Sort order. Valid values: 'asc' (ascending), 'desc' (descending).", example = "asc")
    ),
    responses(
        (status = 200, description = "Successfully retrieved all matching Clients", body = [domain::clients::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 405, description = "Method not allowed")
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
    debug!("GET all Clients");
    debug!("Filter Params: {params:?}");

    let mut params = params;
    IndexParams::apply_sort_defaults(
        &mut params.sort_by,
        &mut params.sort_order,
        SortField::LastName,
    );

    let clients = ClientApi::find_by(app_state.db_conn_ref(), params).await?;

    debug!("Found {} Clients", clients.len());

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), clients)))
}

/// PUT partially update a Client. Omitted fields keep their current values.
#[utoipa::path(
    put,
    path = "/clients/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of client to update"),
    ),
    request_body = crate::params::client::UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Client", body = [domain::clients::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Client not found"),
        (status = 409, description = "A client with this email already exists"),
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
    debug!("PUT Update Client {id} with params: {params:?}");
    params.validate()?;

    let client = ClientApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
        params,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), client)))
}

/// DELETE soft-deletes a Client; the record stays for reporting.
#[utoipa::path(
    delete,
    path = "/clients/{id}",
    params(
        ApiVersion,
        ("id" = Uuid, Path, description = "Id of client to deactivate"),
    ),
    responses(
        (status = 200, description = "Successfully deactivated Client", body = [domain::clients::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Client not found")
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
    debug!("DELETE Client by id: {id}");

    let client = ClientApi::deactivate(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        user.id,
        id,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), client)))
}

/// POST one page of the clients data table.
#[utoipa::path(
    post,
    path = "/clients/table",
    params(ApiVersion),
    request_body = domain::table::TableQuery,
    responses(
        (status = 200, description = "One filtered, sorted page of Clients with the total row count"),
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
    debug!("POST Clients table query: {query:?}");

    let page = ClientApi::table(app_state.db_conn_ref(), &query, app_state.page_bounds()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), page)))
}

#[utoipa::path(
    post,
    path = "/clients/facets",
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
    debug!("POST Clients facets: {:?}", query.column_ids);

    let facets = ClientApi::facets(app_state.db_conn_ref(), &query).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), facets)))
}
