//! Event system for the back office.
//!
//! Domain operations emit a [`DomainEvent`] after a mutation succeeds. Handlers
//! registered on an [`EventPublisher`] react to them; the audit log is the main
//! consumer.
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Business-level record changes. Each variant names the table it touched so
/// handlers can route without knowing the entity types.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    RecordCreated {
        table_name: &'static str,
        record_id: Id,
        /// User that performed the change, `None` for system jobs
        actor_id: Option<Id>,
        /// Complete serialized record as stored after the insert
        record: Value,
    },
    RecordUpdated {
        table_name: &'static str,
        record_id: Id,
        actor_id: Option<Id>,
        record: Value,
    },
    RecordDeleted {
        table_name: &'static str,
        record_id: Id,
        actor_id: Option<Id>,
    },
}

impl DomainEvent {
    pub fn created<T: Serialize>(
        table_name: &'static str,
        record_id: Id,
        actor_id: Option<Id>,
        record: &T,
    ) -> Self {
        DomainEvent::RecordCreated {
            table_name,
            record_id,
            actor_id,
            record: serde_json::to_value(record).unwrap_or(Value::Null),
        }
    }

    pub fn updated<T: Serialize>(
        table_name: &'static str,
        record_id: Id,
        actor_id: Option<Id>,
        record: &T,
    ) -> Self {
        DomainEvent::RecordUpdated {
            table_name,
            record_id,
            actor_id,
            record: serde_json::to_value(record).unwrap_or(Value::Null),
        }
    }

    pub fn deleted(table_name: &'static str, record_id: Id, actor_id: Option<Id>) -> Self {
        DomainEvent::RecordDeleted {
            table_name,
            record_id,
            actor_id,
        }
    }

    pub fn table_name(&self) -> &'static str {
        match self {
            DomainEvent::RecordCreated { table_name, .. }
            | DomainEvent::RecordUpdated { table_name, .. }
            | DomainEvent::RecordDeleted { table_name, .. } => table_name,
        }
    }

    pub fn record_id(&self) -> Id {
        match self {
            DomainEvent::RecordCreated { record_id, .. }
            | DomainEvent::RecordUpdated { record_id, .. }
            | DomainEvent::RecordDeleted { record_id, .. } => *record_id,
        }
    }

    pub fn actor_id(&self) -> Option<Id> {
        match self {
            DomainEvent::RecordCreated { actor_id, .. }
            | DomainEvent::RecordUpdated { actor_id, .. }
            | DomainEvent::RecordDeleted { actor_id, .. } => *actor_id,
        }
    }
}

/// Trait for handling domain events.
/// Implementations perform side effects like writing the audit trail.
/// A handler must never fail the operation that emitted the event, so any
/// error is dealt with inside `handle`.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHandler {
        seen: Mutex<Vec<DomainEvent>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    #[tokio::test]
    async fn publish_delivers_to_every_handler_in_order() {
        let first = Arc::new(RecordingHandler::default());
        let second = Arc::new(RecordingHandler::default());
        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        let id = Id::new_v4();
        publisher
            .publish(DomainEvent::deleted("clients", id, None))
            .await;

        assert_eq!(publisher.handler_count(), 2);
        assert_eq!(first.seen.lock().unwrap().len(), 1);
        assert_eq!(second.seen.lock().unwrap()[0].record_id(), id);
    }

    #[tokio::test]
    async fn publish_without_handlers_is_a_no_op() {
        EventPublisher::default()
            .publish(DomainEvent::deleted("wins", Id::new_v4(), None))
            .await;
    }

    #[test]
    fn created_serializes_the_record() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
        }
        let actor = Id::new_v4();
        let event = DomainEvent::created("coach_teams", Id::new_v4(), Some(actor), &Row { name: "North" });

        assert_eq!(event.table_name(), "coach_teams");
        assert_eq!(event.actor_id(), Some(actor));
        match event {
            DomainEvent::RecordCreated { record, .. } => assert_eq!(record, json!({"name": "North"})),
            other => panic!("unexpected event {other:?}"),
        }
    }
}
