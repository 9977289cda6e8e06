use super::error::Error;
use crate::mutate::{self, UpdateMap};
use entity::goal_categories::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, QueryOrder, Value,
};

use log::*;

pub async fn create(db: &impl ConnectionTrait, category_model: Model) -> Result<Model, Error> {
    debug!("New Goal Category Model to be inserted: {category_model:?}");

    let now = chrono::Utc::now();
    let category_active_model: ActiveModel = ActiveModel {
        name: Set(category_model.name),
        description: Set(category_model.description),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(category_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::Name).all(db).await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let category = find_by_id(db, id).await?;

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, category.into_active_model(), update_map).await
}

/// Deleting a category removes its goal types along with it.
pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let category = find_by_id(db, id).await?;
    Entity::delete_by_id(id).exec(db).await?;
    Ok(category)
}
