use super::error::Error;
use crate::table::TableSchema;
use entity::audit_action::AuditAction;
use entity::audit_logs::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, ActiveValue::Set, ConnectionTrait, Order, QueryOrder};

/// Appends an audit entry. Audit rows are never updated or deleted.
pub async fn create(
    db: &impl ConnectionTrait,
    actor_id: Option<Id>,
    action: AuditAction,
    table_name: &str,
    record_id: Id,
    changes: Json,
) -> Result<Model, Error> {
    let audit_log_active_model = ActiveModel {
        actor_id: Set(actor_id),
        action: Set(action),
        table_name: Set(table_name.to_string()),
        record_id: Set(record_id),
        changes: Set(changes),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    };

    Ok(audit_log_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Entries for a table and, optionally, a single record, newest first.
pub async fn find_by_record(
    db: &impl ConnectionTrait,
    table_name: &str,
    record_id: Option<Id>,
) -> Result<Vec<Model>, Error> {
    let mut query = Entity::find().filter(Column::TableName.eq(table_name));
    if let Some(record_id) = record_id {
        query = query.filter(Column::RecordId.eq(record_id));
    }
    Ok(query.order_by_desc(Column::CreatedAt).all(db).await?)
}

pub fn table_schema() -> TableSchema<Entity> {
    TableSchema::new(Column::CreatedAt, Order::Desc)
        .option("actor_id", Column::ActorId)
        .option("action", Column::Action)
        .option("table_name", Column::TableName)
        .option("record_id", Column::RecordId)
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
    use serde_json::json;

    #[tokio::test]
    async fn create_persists_the_serialized_changes() -> Result<(), Error> {
        let record_id = Id::new_v4();
        let entry = Model {
            id: Id::new_v4(),
            actor_id: None,
            action: AuditAction::Update,
            table_name: "clients".to_string(),
            record_id,
            changes: json!({"status": "active"}),
            created_at: chrono::Utc::now().into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[entry.clone()]])
            .into_connection();

        let created = create(
            &db,
            None,
            AuditAction::Update,
            "clients",
            record_id,
            json!({"status": "active"}),
        )
        .await?;

        assert_eq!(created, entry);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"INSERT INTO \"backoffice\".\"audit_logs\""#));
        Ok(())
    }
}
