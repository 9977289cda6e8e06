use super::error::Error;
use crate::mutate::{self, UpdateMap};
use entity::goal_types::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, QueryOrder, Value,
};

use log::*;

pub async fn create(db: &impl ConnectionTrait, goal_type_model: Model) -> Result<Model, Error> {
    debug!("New Goal Type Model to be inserted: {goal_type_model:?}");

    let now = chrono::Utc::now();
    let goal_type_active_model: ActiveModel = ActiveModel {
        goal_category_id: Set(goal_type_model.goal_category_id),
        name: Set(goal_type_model.name),
        unit: Set(goal_type_model.unit),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(goal_type_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_category(
    db: &impl ConnectionTrait,
    goal_category_id: Option<Id>,
) -> Result<Vec<Model>, Error> {
    let mut query = Entity::find();
    if let Some(goal_category_id) = goal_category_id {
        query = query.filter(Column::GoalCategoryId.eq(goal_category_id));
    }
    Ok(query.order_by_asc(Column::Name).all(db).await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let goal_type = find_by_id(db, id).await?;

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, goal_type.into_active_model(), update_map).await
}

pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let goal_type = find_by_id(db, id).await?;
    Entity::delete_by_id(id).exec(db).await?;
    Ok(goal_type)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn find_by_category_filters_only_when_given() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new(), Vec::<Model>::new()])
            .into_connection();

        find_by_category(&db, None).await?;
        find_by_category(&db, Some(Id::new_v4())).await?;

        let log = db.into_transaction_log();
        let unfiltered = format!("{:?}", log[0]);
        let filtered = format!("{:?}", log[1]);
        assert!(!unfiltered.contains("WHERE"));
        assert!(filtered.contains(r#"WHERE \"goal_types\".\"goal_category_id\" = $1"#));
        Ok(())
    }
}
