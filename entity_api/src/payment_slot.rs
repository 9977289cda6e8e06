use super::error::Error;
use entity::payment_slot_status::PaymentSlotStatus;
use entity::payment_slots::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    ConnectionTrait, QueryOrder,
};
use serde::Serialize;

use log::*;

/// One installment of a plan before it has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledSlot {
    pub sequence: i32,
    pub due_date: Date,
    pub amount_due_cents: i64,
}

pub(crate) async fn create(
    db: &impl ConnectionTrait,
    payment_plan_id: Id,
    scheduled: ScheduledSlot,
) -> Result<Model, Error> {
    let now = chrono::Utc::now();

    let slot_active_model: ActiveModel = ActiveModel {
        payment_plan_id: Set(payment_plan_id),
        sequence: Set(scheduled.sequence),
        due_date: Set(scheduled.due_date),
        amount_due_cents: Set(scheduled.amount_due_cents),
        status: Set(PaymentSlotStatus::Pending),
        paid_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(slot_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_plan(
    db: &impl ConnectionTrait,
    payment_plan_id: Id,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::PaymentPlanId.eq(payment_plan_id))
        .order_by_asc(Column::Sequence)
        .all(db)
        .await?)
}

/// Pending or overdue slots due on or before `due_on_or_before`.
pub async fn find_outstanding(
    db: &impl ConnectionTrait,
    due_on_or_before: Date,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Status.is_in([PaymentSlotStatus::Pending, PaymentSlotStatus::Overdue]))
        .filter(Column::DueDate.lte(due_on_or_before))
        .all(db)
        .await?)
}

/// Sets the status; `paid` stamps `paid_at` with the current time, any other status clears it.
pub async fn update_status(
    db: &impl ConnectionTrait,
    id: Id,
    status: PaymentSlotStatus,
) -> Result<Model, Error> {
    let slot = find_by_id(db, id).await?;
    let paid_at = match status {
        PaymentSlotStatus::Paid => Some(chrono::Utc::now().into()),
        _ => None,
    };
    set_status(db, slot, status, paid_at).await
}

pub(crate) async fn mark_paid(
    db: &impl ConnectionTrait,
    slot: Model,
    paid_at: DateTimeWithTimeZone,
) -> Result<Model, Error> {
    set_status(db, slot, PaymentSlotStatus::Paid, Some(paid_at)).await
}

async fn set_status(
    db: &impl ConnectionTrait,
    slot: Model,
    status: PaymentSlotStatus,
    paid_at: Option<DateTimeWithTimeZone>,
) -> Result<Model, Error> {
    debug!("Payment slot {} moves from {} to {status}", slot.id, slot.status);

    let active_model = ActiveModel {
        id: Unchanged(slot.id),
        payment_plan_id: Unchanged(slot.payment_plan_id),
        sequence: Unchanged(slot.sequence),
        due_date: Unchanged(slot.due_date),
        amount_due_cents: Unchanged(slot.amount_due_cents),
        status: Set(status),
        paid_at: Set(paid_at),
        created_at: Unchanged(slot.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}

/// Moves every pending slot due before `today` to overdue, returning the slots that changed.
pub async fn mark_overdue(db: &impl ConnectionTrait, today: Date) -> Result<Vec<Model>, Error> {
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    let slots = Entity::update_many()
        .col_expr(Column::Status, PaymentSlotStatus::Overdue.as_enum())
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Status.eq(PaymentSlotStatus::Pending))
        .filter(Column::DueDate.lt(today))
        .exec_with_returning(db)
        .await?;

    info!("Marked {} payment slots overdue", slots.len());
    Ok(slots)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn slot(status: PaymentSlotStatus) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            payment_plan_id: Id::new_v4(),
            sequence: 1,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            amount_due_cents: 10_000,
            status,
            paid_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn mark_overdue_returns_the_transitioned_slots() -> Result<(), Error> {
        let overdue = slot(PaymentSlotStatus::Overdue);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[overdue.clone()]])
            .into_connection();

        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let slots = mark_overdue(&db, today).await?;

        assert_eq!(slots, vec![overdue]);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"\"payment_slots\".\"due_date\" < $"#));
        assert!(log.contains("RETURNING"));
        Ok(())
    }

    #[tokio::test]
    async fn update_status_to_paid_stamps_paid_at() -> Result<(), Error> {
        let pending = slot(PaymentSlotStatus::Pending);
        let paid = Model {
            status: PaymentSlotStatus::Paid,
            paid_at: Some(chrono::Utc::now().into()),
            ..pending.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending.clone()], [paid.clone()]])
            .into_connection();

        let updated = update_status(&db, pending.id, PaymentSlotStatus::Paid).await?;

        assert_eq!(updated.status, PaymentSlotStatus::Paid);
        assert!(updated.paid_at.is_some());
        Ok(())
    }
}
