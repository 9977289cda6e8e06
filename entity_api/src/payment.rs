use super::error::{EntityApiErrorKind, Error};
use crate::payment_slot;
use crate::table::TableSchema;
use entity::payments::{ActiveModel, Column, Entity, Model, Relation};
use entity::{clients, payment_plans, payment_slots, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, Order, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

use log::*;

/// A newly recorded payment and, when it was applied to a slot, that slot's current state.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecordedPayment {
    #[schema(value_type = entity::payments::Model)]
    pub payment: Model,
    #[schema(value_type = Option<entity::payment_slots::Model>)]
    pub slot: Option<payment_slots::Model>,
    /// Whether this payment moved the slot to `paid`
    pub slot_settled: bool,
}

/// Records a payment. When it references a slot, the payment's client must own the
/// slot's plan, and the slot is marked paid once its payments cover `amount_due_cents`.
pub async fn record(
    db: &impl TransactionTrait,
    payment_model: Model,
) -> Result<RecordedPayment, Error> {
    debug!("New Payment Model to be recorded: {payment_model:?}");

    let txn = db.begin().await?;

    let mut payment_plan_id = payment_model.payment_plan_id;
    let slot = match payment_model.payment_slot_id {
        Some(slot_id) => {
            // Row lock serializes concurrent settlements of the same slot
            let slot = payment_slots::Entity::find_by_id(slot_id)
                .lock_exclusive()
                .one(&txn)
                .await?
                .ok_or_else(Error::not_found)?;
            let plan = payment_plans::Entity::find_by_id(slot.payment_plan_id)
                .one(&txn)
                .await?
                .ok_or_else(Error::not_found)?;

            if plan.client_id != payment_model.client_id {
                warn!(
                    "Payment for client {} references slot {} of client {}",
                    payment_model.client_id, slot.id, plan.client_id
                );
                return Err(Error::new(EntityApiErrorKind::ValidationError));
            }
            if payment_plan_id.is_some_and(|id| id != plan.id) {
                warn!("Payment plan {payment_plan_id:?} does not own slot {}", slot.id);
                return Err(Error::new(EntityApiErrorKind::ValidationError));
            }
            payment_plan_id = Some(plan.id);
            Some(slot)
        }
        None => None,
    };

    let now = chrono::Utc::now();
    let payment_active_model: ActiveModel = ActiveModel {
        client_id: Set(payment_model.client_id),
        payment_plan_id: Set(payment_plan_id),
        payment_slot_id: Set(payment_model.payment_slot_id),
        amount_cents: Set(payment_model.amount_cents),
        currency: Set(payment_model.currency.to_uppercase()),
        method: Set(payment_model.method),
        paid_at: Set(payment_model.paid_at),
        reference: Set(payment_model.reference),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };
    let payment = payment_active_model.insert(&txn).await?;

    let (slot, slot_settled) = match slot {
        Some(slot) => {
            let (slot, settled) = settle_slot(&txn, slot, payment.paid_at).await?;
            (Some(slot), settled)
        }
        None => (None, false),
    };

    txn.commit().await?;

    Ok(RecordedPayment {
        payment,
        slot,
        slot_settled,
    })
}

async fn settle_slot(
    db: &impl ConnectionTrait,
    slot: payment_slots::Model,
    paid_at: DateTimeWithTimeZone,
) -> Result<(payment_slots::Model, bool), Error> {
    let paid_total: i64 = Entity::find()
        .filter(Column::PaymentSlotId.eq(slot.id))
        .all(db)
        .await?
        .iter()
        .map(|payment| payment.amount_cents)
        .sum();

    debug!(
        "Slot {} has {paid_total} of {} cents paid",
        slot.id, slot.amount_due_cents
    );

    if paid_total >= slot.amount_due_cents && slot.status.is_outstanding() {
        Ok((payment_slot::mark_paid(db, slot, paid_at).await?, true))
    } else {
        Ok((slot, false))
    }
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_client(db: &impl ConnectionTrait, client_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ClientId.eq(client_id))
        .order_by_desc(Column::PaidAt)
        .all(db)
        .await?)
}

/// Payments whose `paid_at` falls within `[from, until)`.
pub async fn find_paid_between(
    db: &impl ConnectionTrait,
    from: DateTimeWithTimeZone,
    until: DateTimeWithTimeZone,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::PaidAt.gte(from))
        .filter(Column::PaidAt.lt(until))
        .all(db)
        .await?)
}

/// Removes the payment without reopening a slot it settled.
pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let payment = find_by_id(db, id).await?;
    Entity::delete_by_id(id).exec(db).await?;
    Ok(payment)
}

pub fn table_schema() -> TableSchema<Entity> {
    TableSchema::new(Column::PaidAt, Order::Desc)
        .join(|| Relation::Clients.def())
        .option("client_id", Column::ClientId)
        .text("client_last_name", clients::Column::LastName)
        .option("payment_plan_id", Column::PaymentPlanId)
        .option("method", Column::Method)
        .option("currency", Column::Currency)
        .number_scaled("amount", Column::AmountCents, 100.0)
        .date("paid_at", Column::PaidAt)
        .text("reference", Column::Reference)
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
    use entity::payment_method::PaymentMethod;
    use entity::payment_slot_status::PaymentSlotStatus;
    use sea_orm::{DatabaseBackend, MockDatabase};

    struct Fixture {
        plan: payment_plans::Model,
        slot: payment_slots::Model,
    }

    fn fixture() -> Fixture {
        let now = chrono::Utc::now();
        let plan = payment_plans::Model {
            id: Id::new_v4(),
            client_id: Id::new_v4(),
            name: "Starter".to_string(),
            total_amount_cents: 10_000,
            currency: "USD".to_string(),
            installment_count: 1,
            frequency: PaymentFrequency::OneTime,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let slot = payment_slots::Model {
            id: Id::new_v4(),
            payment_plan_id: plan.id,
            sequence: 1,
            due_date: plan.start_date,
            amount_due_cents: 10_000,
            status: PaymentSlotStatus::Pending,
            paid_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        };
        Fixture { plan, slot }
    }

    fn payment(client_id: Id, slot_id: Option<Id>, amount_cents: i64) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            client_id,
            payment_plan_id: None,
            payment_slot_id: slot_id,
            amount_cents,
            currency: "usd".to_string(),
            method: PaymentMethod::Card,
            paid_at: now.into(),
            reference: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn record_marks_the_slot_paid_once_covered() -> Result<(), Error> {
        let Fixture { plan, slot } = fixture();
        let earlier = payment(plan.client_id, Some(slot.id), 4_000);
        let recorded = Model {
            payment_plan_id: Some(plan.id),
            ..payment(plan.client_id, Some(slot.id), 6_000)
        };
        let paid_slot = payment_slots::Model {
            status: PaymentSlotStatus::Paid,
            paid_at: Some(recorded.paid_at),
            ..slot.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[slot.clone()]])
            .append_query_results([[plan.clone()]])
            .append_query_results([[recorded.clone()]])
            .append_query_results([vec![earlier, recorded.clone()]])
            .append_query_results([[paid_slot.clone()]])
            .into_connection();

        let result = record(&db, recorded.clone()).await?;

        assert_eq!(result.payment.payment_plan_id, Some(plan.id));
        assert_eq!(result.slot, Some(paid_slot));
        assert!(result.slot_settled);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("COMMIT"));
        Ok(())
    }

    #[tokio::test]
    async fn record_locks_the_slot_before_summing_its_payments() -> Result<(), Error> {
        let Fixture { plan, slot } = fixture();
        let recorded = payment(plan.client_id, Some(slot.id), 5_000);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[slot.clone()]])
            .append_query_results([[plan.clone()]])
            .append_query_results([[recorded.clone()]])
            .append_query_results([[recorded.clone()]])
            .into_connection();

        record(&db, recorded).await?;

        let log = format!("{:?}", db.into_transaction_log());
        let lock = log.find("FOR UPDATE").unwrap();
        assert!(log[..lock].contains("payment_slots"));
        assert!(lock < log.find("INSERT INTO").unwrap());
        Ok(())
    }

    #[tokio::test]
    async fn record_leaves_a_partially_paid_slot_pending() -> Result<(), Error> {
        let Fixture { plan, slot } = fixture();
        let recorded = payment(plan.client_id, Some(slot.id), 2_500);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[slot.clone()]])
            .append_query_results([[plan.clone()]])
            .append_query_results([[recorded.clone()]])
            .append_query_results([[recorded.clone()]])
            .into_connection();

        let result = record(&db, recorded).await?;

        assert!(!result.slot_settled);
        assert_eq!(result.slot.map(|s| s.status), Some(PaymentSlotStatus::Pending));
        Ok(())
    }

    #[tokio::test]
    async fn record_rejects_a_slot_owned_by_another_client() {
        let Fixture { plan, slot } = fixture();
        let recorded = payment(Id::new_v4(), Some(slot.id), 10_000);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[slot.clone()]])
            .append_query_results([[plan.clone()]])
            .into_connection();

        let result = record(&db, recorded).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::ValidationError
        );
    }

    #[tokio::test]
    async fn record_without_a_slot_only_inserts() -> Result<(), Error> {
        let recorded = payment(Id::new_v4(), None, 1_000);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[recorded.clone()]])
            .into_connection();

        let result = record(&db, recorded.clone()).await?;

        assert_eq!(result.payment.id, recorded.id);
        assert!(result.slot.is_none());
        Ok(())
    }
}
