use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// (index name, table, column) for every column the data tables sort or filter on.
const INDEXES: &[(&str, &str, &str)] = &[
    ("clients_last_name", "clients", "last_name"),
    ("clients_status", "clients", "status"),
    ("clients_coach_id", "clients", "coach_id"),
    ("clients_created_at", "clients", "created_at"),
    ("coaches_last_name", "coaches", "last_name"),
    ("coaches_coach_team_id", "coaches", "coach_team_id"),
    ("payment_plans_client_id", "payment_plans", "client_id"),
    ("payment_plans_start_date", "payment_plans", "start_date"),
    ("payment_slots_due_date", "payment_slots", "due_date"),
    ("payment_slots_status", "payment_slots", "status"),
    ("payments_client_id", "payments", "client_id"),
    ("payments_paid_at", "payments", "paid_at"),
    ("coach_payments_coach_id", "coach_payments", "coach_id"),
    ("coach_payments_period_end", "coach_payments", "period_end"),
    ("coach_payments_status", "coach_payments", "status"),
    ("client_activity_periods_client_id", "client_activity_periods", "client_id"),
    ("client_activity_periods_coach_id", "client_activity_periods", "coach_id"),
    ("goals_client_id", "goals", "client_id"),
    ("goals_due_date", "goals", "due_date"),
    ("wins_client_id", "wins", "client_id"),
    ("wins_win_date", "wins", "win_date"),
    ("audit_logs_created_at", "audit_logs", "created_at"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, column) in INDEXES {
            manager
                .create_index(
                    Index::create()
                        .name(*name)
                        .table((Alias::new("backoffice"), Alias::new(*table)))
                        .col(Alias::new(*column))
                        .to_owned(),
                )
                .await?;
        }

        // Record history is always looked up by table and record together
        manager
            .create_index(
                Index::create()
                    .name("audit_logs_table_name_record_id")
                    .table((Alias::new("backoffice"), Alias::new("audit_logs")))
                    .col(Alias::new("table_name"))
                    .col(Alias::new("record_id"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("audit_logs_table_name_record_id")
                    .table((Alias::new("backoffice"), Alias::new("audit_logs")))
                    .to_owned(),
            )
            .await?;

        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(
                    Index::drop()
                        .name(*name)
                        .table((Alias::new("backoffice"), Alias::new(*table)))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
