use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::table::TableSchema;
use entity::coach_payment_status::CoachPaymentStatus;
use entity::coach_payments::{ActiveModel, Column, Entity, Model, Relation};
use entity::{coaches, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, Order, QueryOrder,
    Value,
};
use serde::Serialize;
use utoipa::ToSchema;

use log::*;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CoachPaymentSummary {
    #[schema(value_type = Uuid)]
    pub coach_id: Id,
    pub pending_cents: i64,
    pub approved_cents: i64,
    pub paid_cents: i64,
    pub void_cents: i64,
    /// Everything except voided payouts
    pub total_cents: i64,
    pub payment_count: u64,
}

pub async fn create(db: &impl ConnectionTrait, coach_payment_model: Model) -> Result<Model, Error> {
    debug!("New Coach Payment Model to be inserted: {coach_payment_model:?}");

    let now = chrono::Utc::now();
    let paid_at = match coach_payment_model.status {
        CoachPaymentStatus::Paid => Some(coach_payment_model.paid_at.unwrap_or(now.into())),
        _ => None,
    };

    let coach_payment_active_model: ActiveModel = ActiveModel {
        coach_id: Set(coach_payment_model.coach_id),
        client_id: Set(coach_payment_model.client_id),
        amount_cents: Set(coach_payment_model.amount_cents),
        currency: Set(coach_payment_model.currency.to_uppercase()),
        period_start: Set(coach_payment_model.period_start),
        period_end: Set(coach_payment_model.period_end),
        status: Set(coach_payment_model.status),
        paid_at: Set(paid_at),
        notes: Set(coach_payment_model.notes),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(coach_payment_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_coach(db: &impl ConnectionTrait, coach_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CoachId.eq(coach_id))
        .order_by_desc(Column::PeriodEnd)
        .all(db)
        .await?)
}

/// Non-void payouts whose period ends within `[start, end]`.
pub async fn find_payouts_ending_between(
    db: &impl ConnectionTrait,
    start: Date,
    end: Date,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Status.ne(CoachPaymentStatus::Void))
        .filter(Column::PeriodEnd.between(start, end))
        .all(db)
        .await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let coach_payment = find_by_id(db, id).await?;
    debug!("Existing Coach Payment model to be Updated: {coach_payment:?}");

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, coach_payment.into_active_model(), update_map).await
}

/// Sets the status; `paid` stamps `paid_at`, any other status clears it.
pub async fn update_status(
    db: &impl ConnectionTrait,
    id: Id,
    status: CoachPaymentStatus,
) -> Result<Model, Error> {
    let coach_payment = find_by_id(db, id).await?;
    debug!(
        "Coach payment {id} moves from {} to {status}",
        coach_payment.status
    );

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    let mut active_model = coach_payment.into_active_model();
    active_model.paid_at = Set(match status {
        CoachPaymentStatus::Paid => Some(now),
        _ => None,
    });
    active_model.status = Set(status);
    active_model.updated_at = Set(now);

    Ok(active_model.update(db).await?)
}

pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let coach_payment = find_by_id(db, id).await?;
    Entity::delete_by_id(id).exec(db).await?;
    Ok(coach_payment)
}

pub async fn summary(db: &impl ConnectionTrait, coach_id: Id) -> Result<CoachPaymentSummary, Error> {
    let payments = find_by_coach(db, coach_id).await?;
    Ok(summarize(coach_id, &payments))
}

/// Totals payouts in cents grouped by status.
pub fn summarize(coach_id: Id, payments: &[Model]) -> CoachPaymentSummary {
    payments.iter().fold(
        CoachPaymentSummary {
            coach_id,
            ..Default::default()
        },
        |mut summary, payment| {
            match payment.status {
                CoachPaymentStatus::Pending => summary.pending_cents += payment.amount_cents,
                CoachPaymentStatus::Approved => summary.approved_cents += payment.amount_cents,
                CoachPaymentStatus::Paid => summary.paid_cents += payment.amount_cents,
                CoachPaymentStatus::Void => summary.void_cents += payment.amount_cents,
            }
            if payment.status != CoachPaymentStatus::Void {
                summary.total_cents += payment.amount_cents;
            }
            summary.payment_count += 1;
            summary
        },
    )
}

pub fn table_schema() -> TableSchema<Entity> {
    TableSchema::new(Column::PeriodEnd, Order::Desc)
        .join(|| Relation::Coaches.def())
        .option("coach_id", Column::CoachId)
        .text("coach_last_name", coaches::Column::LastName)
        .option("client_id", Column::ClientId)
        .option("status", Column::Status)
        .option("currency", Column::Currency)
        .number_scaled("amount", Column::AmountCents, 100.0)
        .date("period_start", Column::PeriodStart)
        .date("period_end", Column::PeriodEnd)
        .date("paid_at", Column::PaidAt)
        .date("created_at", Column::CreatedAt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(super) fn coach_payment(status: CoachPaymentStatus, amount_cents: i64) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            coach_id: Id::new_v4(),
            client_id: None,
            amount_cents,
            currency: "USD".to_string(),
            period_start: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            period_end: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            status,
            paid_at: None,
            notes: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn summarize_groups_totals_by_status() {
        let coach_id = Id::new_v4();
        let payments = vec![
            coach_payment(CoachPaymentStatus::Pending, 1_000),
            coach_payment(CoachPaymentStatus::Pending, 500),
            coach_payment(CoachPaymentStatus::Approved, 2_000),
            coach_payment(CoachPaymentStatus::Paid, 4_000),
            coach_payment(CoachPaymentStatus::Void, 9_999),
        ];

        let summary = summarize(coach_id, &payments);

        assert_eq!(summary.coach_id, coach_id);
        assert_eq!(summary.pending_cents, 1_500);
        assert_eq!(summary.approved_cents, 2_000);
        assert_eq!(summary.paid_cents, 4_000);
        assert_eq!(summary.void_cents, 9_999);
        assert_eq!(summary.total_cents, 7_500);
        assert_eq!(summary.payment_count, 5);
    }

    #[test]
    fn summarize_of_nothing_is_zero() {
        let summary = summarize(Id::nil(), &[]);
        assert_eq!(summary.total_cents, 0);
        assert_eq!(summary.payment_count, 0);
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::tests::coach_payment;
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn update_status_to_void_clears_paid_at() -> Result<(), Error> {
        let paid = Model {
            paid_at: Some(chrono::Utc::now().into()),
            ..coach_payment(CoachPaymentStatus::Paid, 1_000)
        };
        let voided = Model {
            status: CoachPaymentStatus::Void,
            paid_at: None,
            ..paid.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[paid.clone()], [voided.clone()]])
            .into_connection();

        let result = update_status(&db, paid.id, CoachPaymentStatus::Void).await?;

        assert_eq!(result.status, CoachPaymentStatus::Void);
        assert!(result.paid_at.is_none());
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"\"paid_at\" = $"#));
        Ok(())
    }
}
