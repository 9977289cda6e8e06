use crate::client_activity_period::date_in;
use crate::coach_payments::{self, Model};
use crate::error::Error;
use crate::table::{Facet, FacetQuery, PageBounds, TablePage, TableQuery};
use crate::{Id, IntoQueryFilterMap, IntoUpdateMap, QuerySort};
use chrono::NaiveDate;
use entity::coach_payment_status::CoachPaymentStatus;
use entity_api::{coach_payment, query, table};
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::coach_payment::{find_by_id, summary, CoachPaymentSummary};

const TABLE: &str = "coach_payments";

fn validate_period(period_start: NaiveDate, period_end: NaiveDate) -> Result<(), Error> {
    if period_end < period_start {
        return Err(Error::validation(
            "period_end: must be on or after period_start",
        ));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    coach_payment_model: Model,
) -> Result<Model, Error> {
    coach_payment_model.validate()?;
    validate_period(
        coach_payment_model.period_start,
        coach_payment_model.period_end,
    )?;

    let coach_payment = coach_payment::create(db, coach_payment_model).await?;
    publisher
        .publish(DomainEvent::created(
            TABLE,
            coach_payment.id,
            Some(actor_id),
            &coach_payment,
        ))
        .await;

    Ok(coach_payment)
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<coach_payments::Column>,
{
    Ok(query::find_by::<coach_payments::Entity, coach_payments::Column, P>(db, params).await?)
}

/// Applies the changes after checking the resulting period is still ordered.
pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let update_map = params.into_update_map();
    let existing = coach_payment::find_by_id(db, id).await?;
    validate_period(
        date_in(&update_map, "period_start").unwrap_or(existing.period_start),
        date_in(&update_map, "period_end").unwrap_or(existing.period_end),
    )?;

    let coach_payment = coach_payment::update(db, id, update_map).await?;
    publisher
        .publish(DomainEvent::updated(
            TABLE,
            coach_payment.id,
            Some(actor_id),
            &coach_payment,
        ))
        .await;

    Ok(coach_payment)
}

pub async fn update_status(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    status: CoachPaymentStatus,
) -> Result<Model, Error> {
    let coach_payment = coach_payment::update_status(db, id, status).await?;
    publisher
        .publish(DomainEvent::updated(
            TABLE,
            coach_payment.id,
            Some(actor_id),
            &coach_payment,
        ))
        .await;

    Ok(coach_payment)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<(), Error> {
    let coach_payment = coach_payment::delete(db, id).await?;
    publisher
        .publish(DomainEvent::deleted(TABLE, coach_payment.id, Some(actor_id)))
        .await;

    Ok(())
}

pub async fn table(
    db: &DatabaseConnection,
    query: &TableQuery,
    bounds: PageBounds,
) -> Result<TablePage<Model>, Error> {
    Ok(table::find_page::<coach_payments::Entity>(
        db,
        &coach_payment::table_schema(),
        query,
        bounds,
    )
    .await?)
}

pub async fn facets(db: &DatabaseConnection, query: &FacetQuery) -> Result<Vec<Facet>, Error> {
    Ok(table::facets(db, &coach_payment::table_schema(), query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_must_not_end_before_it_starts() {
        let may_1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let may_31 = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();

        assert!(validate_period(may_1, may_31).is_ok());
        assert!(validate_period(may_1, may_1).is_ok());
        assert!(validate_period(may_31, may_1).is_err());
    }
}
