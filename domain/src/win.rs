use crate::error::Error;
use crate::wins::Model;
use crate::{Id, IntoUpdateMap};
use entity_api::win;
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::win::{find_by_client, find_by_id};

const TABLE: &str = "wins";

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    win_model: Model,
) -> Result<Model, Error> {
    win_model.validate()?;

    let win = win::create(db, win_model).await?;
    publisher
        .publish(DomainEvent::created(TABLE, win.id, Some(actor_id), &win))
        .await;

    Ok(win)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let win = win::update(db, id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, win.id, Some(actor_id), &win))
        .await;

    Ok(win)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<(), Error> {
    let win = win::delete(db, id).await?;
    publisher
        .publish(DomainEvent::deleted(TABLE, win.id, Some(actor_id)))
        .await;

    Ok(())
}
