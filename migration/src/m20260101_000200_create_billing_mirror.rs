use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// The billing schema is filled by an external sync job. Creating it here only
// guarantees the tables exist for local development; rows are never written
// by the back office.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE SCHEMA IF NOT EXISTS billing;

                CREATE TABLE IF NOT EXISTS billing.charges (
                    id text PRIMARY KEY,
                    customer_id text NOT NULL,
                    amount_cents bigint NOT NULL,
                    amount_refunded_cents bigint NOT NULL DEFAULT 0,
                    currency char(3) NOT NULL,
                    status text NOT NULL,
                    created_at timestamptz NOT NULL
                );

                CREATE TABLE IF NOT EXISTS billing.subscriptions (
                    id text PRIMARY KEY,
                    customer_id text NOT NULL,
                    customer_email text,
                    status text NOT NULL,
                    unit_amount_cents bigint NOT NULL,
                    currency char(3) NOT NULL,
                    interval text NOT NULL,
                    interval_count integer NOT NULL DEFAULT 1,
                    quantity integer NOT NULL DEFAULT 1,
                    current_period_start timestamptz NOT NULL,
                    current_period_end timestamptz NOT NULL,
                    canceled_at timestamptz,
                    created_at timestamptz NOT NULL
                );

                CREATE INDEX IF NOT EXISTS charges_created_at ON billing.charges (created_at);
                CREATE INDEX IF NOT EXISTS subscriptions_status ON billing.subscriptions (status);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        // Owned by the sync job, so it is left in place.
        Ok(())
    }
}
