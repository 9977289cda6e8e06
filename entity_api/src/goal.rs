use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::table::TableSchema;
use entity::goal_status::GoalStatus;
use entity::goals::{ActiveModel, Column, Entity, Model, Relation};
use entity::{goal_types, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, Order, QueryOrder,
    Value,
};

use log::*;

pub async fn create(db: &impl ConnectionTrait, goal_model: Model) -> Result<Model, Error> {
    debug!("New Goal Model to be inserted: {goal_model:?}");

    let now = chrono::Utc::now();
    let completed_at = match goal_model.status {
        GoalStatus::Completed => Some(now.into()),
        _ => None,
    };

    let goal_active_model: ActiveModel = ActiveModel {
        client_id: Set(goal_model.client_id),
        goal_type_id: Set(goal_model.goal_type_id),
        title: Set(goal_model.title),
        description: Set(goal_model.description),
        target_value: Set(goal_model.target_value),
        current_value: Set(goal_model.current_value),
        status: Set(goal_model.status),
        due_date: Set(goal_model.due_date),
        completed_at: Set(completed_at),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(goal_active_model.insert(db).await?)
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
        .order_by_asc(Column::DueDate)
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let goal = find_by_id(db, id).await?;
    debug!("Existing Goal model to be Updated: {goal:?}");

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, goal.into_active_model(), update_map).await
}

/// Sets the status; `completed` stamps `completed_at`, any other status clears it.
pub async fn update_status(
    db: &impl ConnectionTrait,
    id: Id,
    status: GoalStatus,
) -> Result<Model, Error> {
    let goal = find_by_id(db, id).await?;
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();

    let mut active_model = goal.into_active_model();
    active_model.completed_at = Set(match status {
        GoalStatus::Completed => Some(now),
        _ => None,
    });
    active_model.status = Set(status);
    active_model.updated_at = Set(now);

    Ok(active_model.update(db).await?)
}

pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let goal = find_by_id(db, id).await?;
    Entity::delete_by_id(id).exec(db).await?;
    Ok(goal)
}

pub fn table_schema() -> TableSchema<Entity> {
    TableSchema::new(Column::CreatedAt, Order::Desc)
        .join(|| Relation::GoalTypes.def())
        .text("title", Column::Title)
        .option("client_id", Column::ClientId)
        .option("goal_type_id", Column::GoalTypeId)
        .text("goal_type_name", goal_types::Column::Name)
        .option("status", Column::Status)
        .number("target_value", Column::TargetValue)
        .number("current_value", Column::CurrentValue)
        .date("due_date", Column::DueDate)
        .date("completed_at", Column::CompletedAt)
        .date("created_at", Column::CreatedAt)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn goal(status: GoalStatus) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            client_id: Id::new_v4(),
            goal_type_id: Id::new_v4(),
            title: "Run a 10k".to_string(),
            description: None,
            target_value: Some(10),
            current_value: Some(4),
            status,
            due_date: None,
            completed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn completing_a_goal_stamps_completed_at() -> Result<(), Error> {
        let in_progress = goal(GoalStatus::InProgress);
        let completed = Model {
            status: GoalStatus::Completed,
            completed_at: Some(chrono::Utc::now().into()),
            ..in_progress.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[in_progress.clone()], [completed.clone()]])
            .into_connection();

        let result = update_status(&db, in_progress.id, GoalStatus::Completed).await?;

        assert!(result.completed_at.is_some());
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"\"completed_at\" = $"#));
        Ok(())
    }
}
