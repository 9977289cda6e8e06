use crate::error::Error;
use crate::payments::{self, Model};
use crate::table::{Facet, FacetQuery, PageBounds, TablePage, TableQuery};
use crate::{Id, IntoQueryFilterMap, QuerySort};
use entity_api::{payment, query, table};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::payment::{find_by_id, RecordedPayment};

const TABLE: &str = "payments";

/// Records a payment, settling the referenced slot once it is fully paid.
pub async fn record(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    payment_model: Model,
) -> Result<RecordedPayment, Error> {
    payment_model.validate()?;

    let recorded = payment::record(db, payment_model).await?;
    publisher
        .publish(DomainEvent::created(
            TABLE,
            recorded.payment.id,
            Some(actor_id),
            &recorded.payment,
        ))
        .await;

    if let (Some(slot), true) = (&recorded.slot, recorded.slot_settled) {
        info!("Payment {} settled slot {}", recorded.payment.id, slot.id);
        publisher
            .publish(DomainEvent::updated(
                "payment_slots",
                slot.id,
                Some(actor_id),
                slot,
            ))
            .await;
    }

    Ok(recorded)
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<payments::Column>,
{
    Ok(query::find_by::<payments::Entity, payments::Column, P>(db, params).await?)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<(), Error> {
    let payment = payment::delete(db, id).await?;
    publisher
        .publish(DomainEvent::deleted(TABLE, payment.id, Some(actor_id)))
        .await;

    Ok(())
}

pub async fn table(
    db: &DatabaseConnection,
    query: &TableQuery,
    bounds: PageBounds,
) -> Result<TablePage<Model>, Error> {
    Ok(table::find_page::<payments::Entity>(db, &payment::table_schema(), query, bounds).await?)
}

pub async fn facets(db: &DatabaseConnection, query: &FacetQuery) -> Result<Vec<Facet>, Error> {
    Ok(table::facets(db, &payment::table_schema(), query).await?)
}
