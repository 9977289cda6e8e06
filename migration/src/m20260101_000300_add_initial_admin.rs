use password_auth::generate_hash;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DbBackend, Statement, Value};

#[derive(DeriveMigrationName)]
pub struct Migration;

const ADMIN_EMAIL: &str = "admin@backoffice.local";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        insert_initial_admin(manager).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "DELETE FROM backoffice.users WHERE email = $1",
                vec![Value::String(Some(Box::new(ADMIN_EMAIL.to_owned())))],
            ))
            .await?;

        Ok(())
    }
}

// Raw SQL keeps this migration independent of later entity changes.
// The password must be rotated after the first login.
async fn insert_initial_admin(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    let password_hash = generate_hash("password");

    manager
        .get_connection()
        .execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r#"
            INSERT INTO backoffice.users (
                email, first_name, last_name, display_name, password, role, is_active
            ) VALUES ($1, $2, $3, $4, $5, 'admin', true)
            ON CONFLICT (email) DO NOTHING
            "#,
            vec![
                Value::String(Some(Box::new(ADMIN_EMAIL.to_owned()))),
                Value::String(Some(Box::new("Admin".to_owned()))),
                Value::String(Some(Box::new("User".to_owned()))),
                Value::String(Some(Box::new("Admin User".to_owned()))),
                Value::String(Some(Box::new(password_hash))),
            ],
        ))
        .await?;

    Ok(())
}
