use crate::error::Error;
use crate::goal_types::Model;
use crate::{Id, IntoUpdateMap};
use entity_api::goal_type;
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::goal_type::{find_by_category, find_by_id};

const TABLE: &str = "goal_types";

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    goal_type_model: Model,
) -> Result<Model, Error> {
    goal_type_model.validate()?;

    let goal_type = goal_type::create(db, goal_type_model).await?;
    publisher
        .publish(DomainEvent::created(TABLE, goal_type.id, Some(actor_id), &goal_type))
        .await;

    Ok(goal_type)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let goal_type = goal_type::update(db, id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, goal_type.id, Some(actor_id), &goal_type))
        .await;

    Ok(goal_type)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<(), Error> {
    let goal_type = goal_type::delete(db, id).await?;
    publisher
        .publish(DomainEvent::deleted(TABLE, goal_type.id, Some(actor_id)))
        .await;

    Ok(())
}
