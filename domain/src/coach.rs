use crate::coaches::{self, Model};
use crate::error::Error;
use crate::table::{Facet, FacetQuery, PageBounds, TablePage, TableQuery};
use crate::{Id, IntoQueryFilterMap, IntoUpdateMap, QuerySort};
use entity_api::{coach, query, table};
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::coach::find_by_id;

const TABLE: &str = "coaches";

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    coach_model: Model,
) -> Result<Model, Error> {
    coach_model.validate()?;

    let coach = coach::create(db, coach_model).await?;
    publisher
        .publish(DomainEvent::created(TABLE, coach.id, Some(actor_id), &coach))
        .await;

    Ok(coach)
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<coaches::Column>,
{
    Ok(query::find_by::<coaches::Entity, coaches::Column, P>(db, params).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let coach = coach::update(db, id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, coach.id, Some(actor_id), &coach))
        .await;

    Ok(coach)
}

pub async fn deactivate(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<Model, Error> {
    let coach = coach::deactivate(db, id).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, coach.id, Some(actor_id), &coach))
        .await;

    Ok(coach)
}

pub async fn table(
    db: &DatabaseConnection,
    query: &TableQuery,
    bounds: PageBounds,
) -> Result<TablePage<Model>, Error> {
    Ok(table::find_page::<coaches::Entity>(db, &coach::table_schema(), query, bounds).await?)
}

pub async fn facets(db: &DatabaseConnection, query: &FacetQuery) -> Result<Vec<Facet>, Error> {
    Ok(table::facets(db, &coach::table_schema(), query).await?)
}
