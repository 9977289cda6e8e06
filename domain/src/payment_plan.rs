//! Payment plans and the installment schedule generated when a plan is created.

use crate::error::Error;
use crate::payment_plans::{self, Model};
use crate::table::{Facet, FacetQuery, PageBounds, TablePage, TableQuery};
use crate::{Id, IntoQueryFilterMap, IntoUpdateMap, QuerySort};
use chrono::{Days, Months, NaiveDate};
use entity::payment_frequency::PaymentFrequency;
use entity_api::payment_slot::ScheduledSlot;
use entity_api::{payment_plan, query, table};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::payment_plan::{find_by_id, find_with_slots, PaymentPlanWithSlots};

const TABLE: &str = "payment_plans";
const SLOTS_TABLE: &str = "payment_slots";

/// Splits `total_amount_cents` into installments.
///
/// Every slot gets `floor(total / n)` cents and the first one also takes the
/// remainder, so the slots always sum to the total. The first installment is
/// due on `start_date`; later ones follow the plan's frequency. Monthly due
/// dates are computed from `start_date` and clamped to the end of shorter
/// months (Jan 31 → Feb 29 → Mar 31). A one-time plan always has one slot.
pub fn schedule(
    total_amount_cents: i64,
    installment_count: i32,
    frequency: &PaymentFrequency,
    start_date: NaiveDate,
) -> Result<Vec<ScheduledSlot>, Error> {
    if total_amount_cents <= 0 {
        return Err(Error::validation(
            "total_amount_cents: must be a positive amount of cents",
        ));
    }
    let count = match frequency {
        PaymentFrequency::OneTime => 1,
        _ if installment_count < 1 => {
            return Err(Error::validation(
                "installment_count: must be at least 1",
            ))
        }
        _ => installment_count,
    };
    if count as i64 > total_amount_cents {
        return Err(Error::validation(
            "installment_count: cannot exceed the total amount of cents",
        ));
    }

    let base = total_amount_cents / count as i64;
    let remainder = total_amount_cents % count as i64;

    (0..count)
        .map(|index| {
            let due_date = due_date(frequency, start_date, index as u32).ok_or_else(|| {
                warn!("Installment {index} of a plan starting {start_date} is out of range");
                Error::validation("start_date: installment due dates are out of range")
            })?;
            Ok(ScheduledSlot {
                sequence: index + 1,
                due_date,
                amount_due_cents: if index == 0 { base + remainder } else { base },
            })
        })
        .collect()
}

fn due_date(frequency: &PaymentFrequency, start_date: NaiveDate, index: u32) -> Option<NaiveDate> {
    match frequency {
        PaymentFrequency::OneTime => Some(start_date),
        PaymentFrequency::Weekly => start_date.checked_add_days(Days::new(7 * index as u64)),
        PaymentFrequency::Biweekly => start_date.checked_add_days(Days::new(14 * index as u64)),
        PaymentFrequency::Monthly => start_date.checked_add_months(Months::new(index)),
    }
}

/// Creates the plan together with its generated slots.
pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    plan_model: Model,
) -> Result<PaymentPlanWithSlots, Error> {
    plan_model.validate()?;

    let slots = schedule(
        plan_model.total_amount_cents,
        plan_model.installment_count,
        &plan_model.frequency,
        plan_model.start_date,
    )?;
    debug!("Generated {} slots for new payment plan", slots.len());

    let created = payment_plan::create(db, plan_model, slots).await?;

    publisher
        .publish(DomainEvent::created(
            TABLE,
            created.plan.id,
            Some(actor_id),
            &created.plan,
        ))
        .await;
    for slot in &created.slots {
        publisher
            .publish(DomainEvent::created(SLOTS_TABLE, slot.id, Some(actor_id), slot))
            .await;
    }

    Ok(created)
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<payment_plans::Column>,
{
    Ok(query::find_by::<payment_plans::Entity, payment_plans::Column, P>(db, params).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let plan = payment_plan::update(db, id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, plan.id, Some(actor_id), &plan))
        .await;

    Ok(plan)
}

pub async fn deactivate(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<Model, Error> {
    let plan = payment_plan::deactivate(db, id).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, plan.id, Some(actor_id), &plan))
        .await;

    Ok(plan)
}

pub async fn table(
    db: &DatabaseConnection,
    query: &TableQuery,
    bounds: PageBounds,
) -> Result<TablePage<Model>, Error> {
    Ok(
        table::find_page::<payment_plans::Entity>(db, &payment_plan::table_schema(), query, bounds)
            .await?,
    )
}

pub async fn facets(db: &DatabaseConnection, query: &FacetQuery) -> Result<Vec<Facet>, Error> {
    Ok(table::facets(db, &payment_plan::table_schema(), query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn slots_sum_to_the_total_with_remainder_on_the_first() {
        let slots = schedule(10_000, 3, &PaymentFrequency::Monthly, date(2024, 1, 15)).unwrap();

        let amounts: Vec<i64> = slots.iter().map(|s| s.amount_due_cents).collect();
        assert_eq!(amounts, vec![3_334, 3_333, 3_333]);
        assert_eq!(amounts.iter().sum::<i64>(), 10_000);
        assert_eq!(
            slots.iter().map(|s| s.sequence).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn monthly_due_dates_clamp_to_month_end() {
        let slots = schedule(40_000, 4, &PaymentFrequency::Monthly, date(2024, 1, 31)).unwrap();

        let due: Vec<NaiveDate> = slots.iter().map(|s| s.due_date).collect();
        assert_eq!(
            due,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30)
            ]
        );
    }

    #[test]
    fn weekly_and_biweekly_due_dates_strictly_increase() {
        let weekly = schedule(700, 3, &PaymentFrequency::Weekly, date(2024, 12, 24)).unwrap();
        assert_eq!(
            weekly.iter().map(|s| s.due_date).collect::<Vec<_>>(),
            vec![date(2024, 12, 24), date(2024, 12, 31), date(2025, 1, 7)]
        );

        let biweekly = schedule(700, 2, &PaymentFrequency::Biweekly, date(2024, 2, 20)).unwrap();
        assert_eq!(biweekly[1].due_date, date(2024, 3, 5));
        assert!(biweekly.windows(2).all(|w| w[0].due_date < w[1].due_date));
    }

    #[test]
    fn one_time_plans_have_a_single_slot() {
        let slots = schedule(12_345, 6, &PaymentFrequency::OneTime, date(2024, 5, 1)).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].amount_due_cents, 12_345);
        assert_eq!(slots[0].due_date, date(2024, 5, 1));
    }

    #[test]
    fn rejects_non_positive_totals_and_counts() {
        let zero_total = schedule(0, 1, &PaymentFrequency::Monthly, date(2024, 5, 1));
        assert!(matches!(
            zero_total.unwrap_err().error_kind,
            DomainErrorKind::Validation(_)
        ));
        assert!(schedule(100, 0, &PaymentFrequency::Weekly, date(2024, 5, 1)).is_err());
    }

    #[test]
    fn rejects_more_installments_than_cents() {
        assert!(schedule(2, 3, &PaymentFrequency::Weekly, date(2024, 5, 1)).is_err());
        assert!(schedule(3, 3, &PaymentFrequency::Weekly, date(2024, 5, 1)).is_ok());
    }
}
