use sea_orm_migration::prelude::*;

// Reads DATABASE_URL and DATABASE_SCHEMA; `cargo run -p migration -- up`
#[async_std::main]
async fn main() {
    cli::run_cli(migration::Migrator).await;
}
