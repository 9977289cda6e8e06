use crate::clients::{self, Model};
use crate::error::Error;
use crate::table::{Facet, FacetQuery, PageBounds, TablePage, TableQuery};
use crate::{Id, IntoQueryFilterMap, IntoUpdateMap, QuerySort};
use entity_api::{client, query, table};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::client::find_by_id;

const TABLE: &str = "clients";

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    client_model: Model,
) -> Result<Model, Error> {
    client_model.validate()?;

    let client = client::create(db, client_model).await?;
    publisher
        .publish(DomainEvent::created(TABLE, client.id, Some(actor_id), &client))
        .await;

    Ok(client)
}

pub async fn find_by<P>(db: &DatabaseConnection, params: P) -> Result<Vec<Model>, Error>
where
    P: IntoQueryFilterMap + QuerySort<clients::Column>,
{
    Ok(query::find_by::<clients::Entity, clients::Column, P>(db, params).await?)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let client = client::update(db, id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, client.id, Some(actor_id), &client))
        .await;

    Ok(client)
}

pub async fn deactivate(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<Model, Error> {
    let client = client::deactivate(db, id).await?;
    info!("Client {id} deactivated by {actor_id}");
    publisher
        .publish(DomainEvent::updated(TABLE, client.id, Some(actor_id), &client))
        .await;

    Ok(client)
}

pub async fn table(
    db: &DatabaseConnection,
    query: &TableQuery,
    bounds: PageBounds,
) -> Result<TablePage<Model>, Error> {
    Ok(table::find_page::<clients::Entity>(db, &client::table_schema(), query, bounds).await?)
}

pub async fn facets(db: &DatabaseConnection, query: &FacetQuery) -> Result<Vec<Facet>, Error> {
    Ok(table::facets(db, &client::table_schema(), query).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use async_trait::async_trait;
    use entity::client_status::ClientStatus;
    use events::EventHandler;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<DomainEvent>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    fn client_model(email: &str) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: None,
            status: ClientStatus::Active,
            coach_id: None,
            tags: vec![],
            notes: None,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_publishes_exactly_one_created_event() -> Result<(), Error> {
        let client = client_model("ada@example.com");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[client.clone()]])
            .into_connection();
        let recorder = Arc::new(RecordingHandler::default());
        let publisher = EventPublisher::new().with_handler(recorder.clone());
        let actor_id = Id::new_v4();

        create(&db, &publisher, actor_id, client.clone()).await?;

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DomainEvent::RecordCreated { table_name: "clients", record_id, actor_id: Some(actor), .. }
                if *record_id == client.id && *actor == actor_id
        ));
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_an_invalid_email_without_touching_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let publisher = EventPublisher::new();

        let result = create(&db, &publisher, Id::new_v4(), client_model("not-an-email")).await;

        assert!(matches!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Validation(_)
        ));
        assert!(db.into_transaction_log().is_empty());
    }
}
