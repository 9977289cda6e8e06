use crate::error::Error;
use crate::goal_categories::Model;
use crate::{Id, IntoUpdateMap};
use entity_api::goal_category;
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::goal_category::{find_all, find_by_id};

const TABLE: &str = "goal_categories";

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    category_model: Model,
) -> Result<Model, Error> {
    category_model.validate()?;

    let category = goal_category::create(db, category_model).await?;
    publisher
        .publish(DomainEvent::created(TABLE, category.id, Some(actor_id), &category))
        .await;

    Ok(category)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let category = goal_category::update(db, id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, category.id, Some(actor_id), &category))
        .await;

    Ok(category)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<(), Error> {
    let category = goal_category::delete(db, id).await?;
    publisher
        .publish(DomainEvent::deleted(TABLE, category.id, Some(actor_id)))
        .await;

    Ok(())
}
