use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::payment_slot::{self, ScheduledSlot};
use crate::table::TableSchema;
use entity::payment_plans::{ActiveModel, Column, Entity, Model, Relation};
use entity::{clients, payment_slots, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, Order,
    TransactionTrait, Value,
};
use serde::Serialize;
use utoipa::ToSchema;

use log::*;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PaymentPlanWithSlots {
    #[serde(flatten)]
    pub plan: Model,
    #[schema(value_type = Vec<entity::payment_slots::Model>)]
    pub slots: Vec<payment_slots::Model>,
}

/// Inserts the plan and its installment schedule in a single transaction.
pub async fn create(
    db: &impl TransactionTrait,
    plan_model: Model,
    schedule: Vec<ScheduledSlot>,
) -> Result<PaymentPlanWithSlots, Error> {
    debug!("New Payment Plan Model to be inserted: {plan_model:?}");

    let now = chrono::Utc::now();
    let txn = db.begin().await?;

    let plan_active_model: ActiveModel = ActiveModel {
        client_id: Set(plan_model.client_id),
        name: Set(plan_model.name),
        total_amount_cents: Set(plan_model.total_amount_cents),
        currency: Set(plan_model.currency.to_uppercase()),
        installment_count: Set(schedule.len() as i32),
        frequency: Set(plan_model.frequency),
        start_date: Set(plan_model.start_date),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let plan = plan_active_model.insert(&txn).await?;

    let mut slots = Vec::with_capacity(schedule.len());
    for scheduled in schedule {
        slots.push(payment_slot::create(&txn, plan.id, scheduled).await?);
    }

    txn.commit().await?;

    Ok(PaymentPlanWithSlots { plan, slots })
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_with_slots(
    db: &impl ConnectionTrait,
    id: Id,
) -> Result<PaymentPlanWithSlots, Error> {
    let plan = find_by_id(db, id).await?;
    let slots = payment_slot::find_by_plan(db, id).await?;
    Ok(PaymentPlanWithSlots { plan, slots })
}

/// Only descriptive fields may change once slots exist; callers restrict the map accordingly.
pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let plan = find_by_id(db, id).await?;
    debug!("Existing Payment Plan model to be Updated: {plan:?}");

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, plan.into_active_model(), update_map).await
}

pub async fn deactivate(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let mut update_map = UpdateMap::new();
    update_map.insert("is_active".to_string(), Some(Value::from(false)));
    update(db, id, update_map).await
}

pub fn table_schema() -> TableSchema<Entity> {
    TableSchema::new(Column::CreatedAt, Order::Desc)
        .join(|| Relation::Clients.def())
        .text("name", Column::Name)
        .option("client_id", Column::ClientId)
        .text("client_last_name", clients::Column::LastName)
        .option("frequency", Column::Frequency)
        .option("currency", Column::Currency)
        .number_scaled("total_amount", Column::TotalAmountCents, 100.0)
        .number("installment_count", Column::InstallmentCount)
        .date("start_date", Column::StartDate)
        .option("is_active", Column::IsActive)
        .date("created_at", Column::CreatedAt)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use entity::payment_frequency::PaymentFrequency;
    use entity::payment_slot_status::PaymentSlotStatus;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn create_inserts_plan_and_slots_in_one_transaction() -> Result<(), Error> {
        let now = chrono::Utc::now();
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let plan = Model {
            id: Id::new_v4(),
            client_id: Id::new_v4(),
            name: "Quarterly coaching".to_string(),
            total_amount_cents: 30_000,
            currency: "usd".to_string(),
            installment_count: 2,
            frequency: PaymentFrequency::Monthly,
            start_date: start,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let slot = |sequence: i32, due_date: NaiveDate| payment_slots::Model {
            id: Id::new_v4(),
            payment_plan_id: plan.id,
            sequence,
            due_date,
            amount_due_cents: 15_000,
            status: PaymentSlotStatus::Pending,
            paid_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let first = slot(1, start);
        let second = slot(2, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[plan.clone()]])
            .append_query_results([[first.clone()], [second.clone()]])
            .into_connection();

        let schedule = vec![
            ScheduledSlot {
                sequence: 1,
                due_date: first.due_date,
                amount_due_cents: 15_000,
            },
            ScheduledSlot {
                sequence: 2,
                due_date: second.due_date,
                amount_due_cents: 15_000,
            },
        ];
        let created = create(&db, plan.clone(), schedule).await?;

        assert_eq!(created.plan.id, plan.id);
        assert_eq!(created.slots, vec![first, second]);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("BEGIN"));
        assert!(log.contains("COMMIT"));
        assert!(log.contains("USD"));
        Ok(())
    }
}
