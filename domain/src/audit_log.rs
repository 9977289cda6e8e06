use crate::audit_logs::{self, Model};
use crate::error::Error;
use crate::table::{Facet, FacetQuery, PageBounds, TablePage, TableQuery};
use async_trait::async_trait;
use entity::audit_action::AuditAction;
use entity_api::{audit_log, table};
use events::{DomainEvent, EventHandler};
use log::*;
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;

pub use entity_api::audit_log::{find_by_id, find_by_record};

/// Persists every domain event as an `audit_logs` row.
pub struct AuditLogHandler {
    db: Arc<DatabaseConnection>,
}

impl AuditLogHandler {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Splits an event into the columns of its audit entry.
pub fn audit_entry(event: &DomainEvent) -> (AuditAction, serde_json::Value) {
    match event {
        DomainEvent::RecordCreated { record, .. } => (AuditAction::Create, record.clone()),
        DomainEvent::RecordUpdated { record, .. } => (AuditAction::Update, record.clone()),
        DomainEvent::RecordDeleted { .. } => (AuditAction::Delete, json!({})),
    }
}

#[async_trait]
impl EventHandler for AuditLogHandler {
    async fn handle(&self, event: &DomainEvent) {
        let (action, changes) = audit_entry(event);
        let result = audit_log::create(
            self.db.as_ref(),
            event.actor_id(),
            action,
            event.table_name(),
            event.record_id(),
            changes,
        )
        .await;

        // The originating request already succeeded, so a failed audit write is only logged
        if let Err(err) = result {
            error!(
                "Failed to write audit log for {} {}: {err:?}",
                event.table_name(),
                event.record_id()
            );
        }
    }
}

pub async fn table(
    db: &DatabaseConnection,
    query: &TableQuery,
    bounds: PageBounds,
) -> Result<TablePage<Model>, Error> {
    Ok(table::find_page::<audit_logs::Entity>(db, &audit_log::table_schema(), query, bounds).await?)
}

pub async fn facets(db: &DatabaseConnection, query: &FacetQuery) -> Result<Vec<Facet>, Error> {
    Ok(table::facets(db, &audit_log::table_schema(), query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Id;

    #[test]
    fn deletes_are_audited_with_empty_changes() {
        let event = DomainEvent::deleted("clients", Id::new_v4(), None);
        assert_eq!(audit_entry(&event), (AuditAction::Delete, json!({})));
    }

    #[test]
    fn updates_carry_the_serialized_record() {
        let event = DomainEvent::updated(
            "goals",
            Id::new_v4(),
            Some(Id::new_v4()),
            &json!({"title": "Run a 10k"}),
        );
        assert_eq!(
            audit_entry(&event),
            (AuditAction::Update, json!({"title": "Run a 10k"}))
        );
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use crate::Id;
    use events::EventPublisher;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn handler_swallows_database_failures() {
        // No query results are queued, so the insert fails
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let handler = AuditLogHandler::new(Arc::new(db));

        handler
            .handle(&DomainEvent::deleted("wins", Id::new_v4(), None))
            .await;
    }

    #[tokio::test]
    async fn handler_inserts_one_row_per_event() {
        let entry = Model {
            id: Id::new_v4(),
            actor_id: None,
            action: AuditAction::Delete,
            table_name: "wins".to_string(),
            record_id: Id::new_v4(),
            changes: json!({}),
            created_at: chrono::Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry.clone()]])
                .into_connection(),
        );
        let publisher = EventPublisher::new().with_handler(Arc::new(AuditLogHandler::new(db.clone())));

        publisher
            .publish(DomainEvent::deleted("wins", entry.record_id, None))
            .await;

        drop(publisher);
        let db = Arc::try_unwrap(db).unwrap();
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT INTO"));
        assert!(log.contains(&entry.record_id.to_string()));
    }
}
