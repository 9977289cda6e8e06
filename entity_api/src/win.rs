use super::error::Error;
use crate::mutate::{self, UpdateMap};
use entity::wins::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, QueryOrder, Value,
};

use log::*;

pub async fn create(db: &impl ConnectionTrait, win_model: Model) -> Result<Model, Error> {
    debug!("New Win Model to be inserted: {win_model:?}");

    let now = chrono::Utc::now();
    let win_active_model: ActiveModel = ActiveModel {
        client_id: Set(win_model.client_id),
        goal_id: Set(win_model.goal_id),
        coach_id: Set(win_model.coach_id),
        title: Set(win_model.title),
        description: Set(win_model.description),
        win_date: Set(win_model.win_date),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(win_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_client(db: &impl ConnectionTrait, client_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ClientId.eq(client_id))
        .order_by_desc(Column::WinDate)
        .all(db)
        .await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let win = find_by_id(db, id).await?;

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, win.into_active_model(), update_map).await
}

pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let win = find_by_id(db, id).await?;
    Entity::delete_by_id(id).exec(db).await?;
    Ok(win)
}
