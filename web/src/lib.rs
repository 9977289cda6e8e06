use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use axum_login::AuthManagerLayerBuilder;
use domain::audit_log::AuditLogHandler;
use domain::table::PageBounds;
use domain::user::Backend;
use events::EventPublisher;
use log::*;
use sea_orm::DatabaseConnection;
use service::config::{ApiVersion, Config, PLATFORM_SCHEMA};
use std::io;
use std::sync::Arc;
use time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_sessions::{session_store::ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

mod controller;
mod error;
mod extractors;
mod middleware;
mod params;
mod protect;
mod router;

pub use error::{Error, Result};

/// Interval between sweeps of expired rows in the session table.
const SESSION_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Web layer state handed to every handler.
///
/// Wraps the infrastructure-only `service::AppState` and adds the domain event
/// publisher every mutation reports to.
#[derive(Clone)]
pub struct AppState {
    service_state: service::AppState,
    pub event_publisher: Arc<EventPublisher>,
}

impl AppState {
    pub fn new(app_config: Config, db: &Arc<DatabaseConnection>) -> Self {
        let event_publisher =
            EventPublisher::new().with_handler(Arc::new(AuditLogHandler::new(Arc::clone(db))));

        Self {
            service_state: service::AppState::new(app_config, db),
            event_publisher: Arc::new(event_publisher),
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.service_state.db_conn_ref()
    }

    pub fn config(&self) -> &Config {
        &self.service_state.config
    }

    pub fn page_bounds(&self) -> PageBounds {
        let (default_size, max_size) = self.service_state.page_size_bounds();
        PageBounds {
            default_size,
            max_size,
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static(ApiVersion::field_name()),
        ])
}

pub async fn init_server(app_state: AppState) -> io::Result<()> {
    let config = app_state.config().clone();

    // Sessions live in the same PostgreSQL database, next to the back office tables
    let session_store = PostgresStore::new(
        app_state
            .db_conn_ref()
            .get_postgres_connection_pool()
            .clone(),
    )
    .with_schema_name(PLATFORM_SCHEMA)
    .map_err(io::Error::other)?
    .with_table_name("authorized_sessions")
    .map_err(io::Error::other)?;

    session_store.migrate().await.map_err(io::Error::other)?;

    tokio::task::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(
                SESSION_CLEANUP_INTERVAL_SECS,
            )),
    );

    let session_layer = SessionManagerLayer::new(session_store)
        .with_name("id")
        .with_secure(config.is_production())
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            config.backend_session_expiry_seconds as i64,
        )));

    let backend = Backend::new(&app_state.service_state.database_connection);
    let auth_layer = AuthManagerLayerBuilder::new(backend, session_layer).build();

    let host = config.interface.as_deref().unwrap_or("127.0.0.1");
    let server_url = format!("{host}:{}", config.port);
    let listener = TcpListener::bind(&server_url).await?;

    let app = router::define_routes(app_state)
        .layer(auth_layer)
        .layer(cors_layer(&config));

    info!("Server starting... listening for connections on http://{server_url}");

    axum::serve(listener, app).await
}
