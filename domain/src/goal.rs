use crate::error::Error;
use crate::goals::{self, Model};
use crate::table::{Facet, FacetQuery, PageBounds, TablePage, TableQuery};
use crate::{Id, IntoQueryFilterMap, IntoUpdateMap, QuerySort};
use entity::goal_status::GoalStatus;
use entity_api::{goal, query, table};
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::goal::find_by_id;

const TABLE: &str = "goals";

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    goal_model: Model,
) -> Result<Model, Error> {
    goal_model.validate()?;

    let goal = goal::create(db, goal_model).await?;
    publisher
        .publish(DomainEvent::created(TABLE, goal.id, Some(actor_id), &goal))
        .await;

    Ok(goal)
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<goals::Column>,
{
    Ok(query::find_by::<goals::Entity, goals::Column, P>(db, params).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let goal = goal::update(db, id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, goal.id, Some(actor_id), &goal))
        .await;

    Ok(goal)
}

pub async fn update_status(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    status: GoalStatus,
) -> Result<Model, Error> {
    let goal = goal::update_status(db, id, status).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, goal.id, Some(actor_id), &goal))
        .await;

    Ok(goal)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<(), Error> {
    let goal = goal::delete(db, id).await?;
    publisher
        .publish(DomainEvent::deleted(TABLE, goal.id, Some(actor_id)))
        .await;

    Ok(())
}

pub async fn table(
    db: &DatabaseConnection,
    query: &TableQuery,
    bounds: PageBounds,
) -> Result<TablePage<Model>, Error> {
    Ok(table::find_page::<goals::Entity>(db, &goal::table_schema(), query, bounds).await?)
}

pub async fn facets(db: &DatabaseConnection, query: &FacetQuery) -> Result<Vec<Facet>, Error> {
    Ok(table::facets(db, &goal::table_schema(), query).await?)
}
