use config::{Config, PLATFORM_SCHEMA};
use log::info;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::time::Duration;

pub mod config;
pub mod logging;

/// Pool settings for the back office database.
///
/// The search path is pinned to the back office schema so entities resolve without
/// qualification; billing mirror entities carry their own schema name.
fn connect_options(config: &Config) -> ConnectOptions {
    let mut opt = ConnectOptions::new(config.database_url().to_owned());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime_secs))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug)
        .set_schema_search_path(PLATFORM_SCHEMA);
    opt
}

/// Opens the pooled PostgreSQL connection shared by every request handler.
pub async fn init_database(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let opt = connect_options(config);
    info!(
        "Connecting to the back office database (schema {PLATFORM_SCHEMA}, pool {}..{})",
        config.db_min_connections, config.db_max_connections,
    );

    Database::connect(opt).await
}

/// Infrastructure shared by every layer above the database: the connection pool
/// and the parsed configuration.
#[derive(Clone)]
pub struct AppState {
    pub database_connection: Arc<DatabaseConnection>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, db: &Arc<DatabaseConnection>) -> Self {
        Self {
            database_connection: Arc::clone(db),
            config: app_config,
        }
    }

    pub fn db_conn_ref(&self) -> &DatabaseConnection {
        self.database_connection.as_ref()
    }

    /// Default and maximum page sizes applied to data table requests.
    pub fn page_size_bounds(&self) -> (u64, u64) {
        page_size_bounds(self.config.default_page_size, self.config.max_page_size)
    }
}

// A zero maximum would make every page empty, so it is raised to one
fn page_size_bounds(default_size: u64, max_size: u64) -> (u64, u64) {
    let max = max_size.max(1);
    (default_size.clamp(1, max), max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_options_follow_the_pool_configuration() {
        let config = Config::from_env();
        let opt = connect_options(&config);

        assert_eq!(opt.get_url(), config.database_url());
        assert_eq!(opt.get_max_connections(), Some(config.db_max_connections));
        assert_eq!(opt.get_min_connections(), Some(config.db_min_connections));
    }

    #[test]
    fn page_size_bounds_keep_the_default_within_the_maximum() {
        assert_eq!(page_size_bounds(10, 100), (10, 100));
        assert_eq!(page_size_bounds(250, 100), (100, 100));
        assert_eq!(page_size_bounds(0, 0), (1, 1));
    }
}
