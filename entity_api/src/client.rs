use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::table::TableSchema;
use entity::clients::{ActiveModel, Column, Entity, Model, Relation};
use entity::{coaches, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, Order, PaginatorTrait,
    QuerySelect, Value,
};

use log::*;

pub async fn create(db: &impl ConnectionTrait, client_model: Model) -> Result<Model, Error> {
    debug!("New Client Model to be inserted: {client_model:?}");

    let now = chrono::Utc::now();

    let client_active_model: ActiveModel = ActiveModel {
        first_name: Set(client_model.first_name),
        last_name: Set(client_model.last_name),
        email: Set(client_model.email.to_lowercase()),
        phone: Set(client_model.phone),
        status: Set(client_model.status),
        coach_id: Set(client_model.coach_id),
        tags: Set(client_model.tags),
        notes: Set(client_model.notes),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(client_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Like [`find_by_id`], but holds a row lock until the surrounding transaction ends.
pub async fn find_by_id_for_update(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .lock_exclusive()
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let client = find_by_id(db, id).await?;
    debug!("Existing Client model to be Updated: {client:?}");

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, client.into_active_model(), update_map).await
}

/// Clients are never removed, only marked inactive.
pub async fn deactivate(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let mut update_map = UpdateMap::new();
    update_map.insert("is_active".to_string(), Some(Value::from(false)));
    update(db, id, update_map).await
}

pub async fn count_active_by_coaches(
    db: &impl ConnectionTrait,
    coach_ids: Vec<Id>,
) -> Result<u64, Error> {
    if coach_ids.is_empty() {
        return Ok(0);
    }
    Ok(Entity::find()
        .filter(Column::CoachId.is_in(coach_ids))
        .filter(Column::IsActive.eq(true))
        .filter(Column::Status.eq(entity::client_status::ClientStatus::Active))
        .count(db)
        .await?)
}

pub fn table_schema() -> TableSchema<Entity> {
    TableSchema::new(Column::CreatedAt, Order::Desc)
        .join(|| Relation::Coaches.def())
        .text("first_name", Column::FirstName)
        .text("last_name", Column::LastName)
        .text("email", Column::Email)
        .option("status", Column::Status)
        .multi_option("tags", Column::Tags)
        .option("coach_id", Column::CoachId)
        .text("coach_last_name", coaches::Column::LastName)
        .date("created_at", Column::CreatedAt)
        .option("is_active", Column::IsActive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::FilterType;

    #[test]
    fn table_schema_exposes_the_client_columns() {
        let schema = table_schema();
        let ids: Vec<&str> = schema.columns().iter().map(|c| c.id).collect();

        assert_eq!(
            ids,
            vec![
                "first_name",
                "last_name",
                "email",
                "status",
                "tags",
                "coach_id",
                "coach_last_name",
                "created_at",
                "is_active"
            ]
        );
        assert_eq!(
            schema.get("tags").map(|c| c.filter_type),
            Some(FilterType::MultiOption)
        );
        assert_eq!(schema.joins().count(), 1);
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::client_status::ClientStatus;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn client_model() -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            status: ClientStatus::Lead,
            coach_id: None,
            tags: vec!["referral".to_string()],
            notes: None,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_a_new_client_model() -> Result<(), Error> {
        let client = client_model();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[client.clone()]])
            .into_connection();

        let created = create(&db, client.clone()).await?;

        assert_eq!(created.id, client.id);
        assert_eq!(created.tags, client.tags);
        Ok(())
    }

    #[tokio::test]
    async fn deactivate_marks_the_client_inactive() -> Result<(), Error> {
        let client = client_model();
        let deactivated = Model {
            is_active: false,
            ..client.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[client.clone()], [deactivated.clone()]])
            .into_connection();

        let result = deactivate(&db, client.id).await?;

        assert!(!result.is_active);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("UPDATE"));
        assert!(!log.contains("DELETE"));
        Ok(())
    }

    #[tokio::test]
    async fn update_returns_not_found_for_missing_client() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = update(&db, Id::new_v4(), UpdateMap::new()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn count_active_by_coaches_short_circuits_without_coaches() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        assert_eq!(count_active_by_coaches(&db, vec![]).await?, 0);
        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }
}
