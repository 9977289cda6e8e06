//! Periods during which a client is actively coached.
//!
//! A period covers every day from `start_date` through `end_date` inclusive; a
//! missing `end_date` means the period is still running. Periods of the same
//! client never overlap.

use crate::client_activity_periods::Model;
use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::{Id, IntoUpdateMap, UpdateMap};
use chrono::NaiveDate;
use entity_api::error::Error as EntityApiError;
use entity_api::{client, client_activity_period, coach};
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait, Value};

pub use entity_api::client_activity_period::{find_active_on, find_by_client, find_by_coach, find_by_id};

const TABLE: &str = "client_activity_periods";

/// Reads a date an update map is about to write.
pub(crate) fn date_in(update_map: &UpdateMap, key: &str) -> Option<NaiveDate> {
    match update_map.get(key) {
        Some(Value::ChronoDate(Some(date))) => Some(**date),
        _ => None,
    }
}

fn validate_dates(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Result<(), Error> {
    match end_date {
        Some(end_date) if end_date < start_date => Err(Error::validation(
            "end_date: must be on or after start_date",
        )),
        _ => Ok(()),
    }
}

/// Opens a transaction holding the client's row lock. Every period write for a
/// client goes through here, so overlap checks for one client run one at a time.
async fn lock_client(db: &DatabaseConnection, client_id: Id) -> Result<DatabaseTransaction, Error> {
    let txn = db.begin().await.map_err(EntityApiError::from)?;
    client::find_by_id_for_update(&txn, client_id)
        .await
        .map_err(Error::from)
        .map_err(missing_reference("client_id"))?;
    Ok(txn)
}

async fn commit(txn: DatabaseTransaction) -> Result<(), Error> {
    txn.commit().await.map_err(EntityApiError::from)?;
    Ok(())
}

async fn ensure_no_overlap(
    db: &impl ConnectionTrait,
    client_id: Id,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    exclude_id: Option<Id>,
) -> Result<(), Error> {
    let overlapping =
        client_activity_period::find_overlapping(db, client_id, start_date, end_date, exclude_id)
            .await?;

    match overlapping.first() {
        Some(existing) => {
            warn!(
                "Activity period {start_date}..{end_date:?} for client {client_id} overlaps period {}",
                existing.id
            );
            Err(Error::validation(format!(
                "start_date: overlaps the client's activity period starting {}",
                existing.start_date
            )))
        }
        None => Ok(()),
    }
}

/// Turns a missing referenced record into a validation failure on `field`.
fn missing_reference(field: &str) -> impl FnOnce(Error) -> Error + '_ {
    move |err| match err.error_kind {
        DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)) => {
            Error::validation(format!("{field}: does not exist"))
        }
        _ => err,
    }
}

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    period_model: Model,
) -> Result<Model, Error> {
    validate_dates(period_model.start_date, period_model.end_date)?;

    let txn = lock_client(db, period_model.client_id).await?;
    coach::find_by_id(&txn, period_model.coach_id)
        .await
        .map_err(Error::from)
        .map_err(missing_reference("coach_id"))?;

    ensure_no_overlap(
        &txn,
        period_model.client_id,
        period_model.start_date,
        period_model.end_date,
        None,
    )
    .await?;

    let period = client_activity_period::create(&txn, period_model).await?;
    commit(txn).await?;

    publisher
        .publish(DomainEvent::created(TABLE, period.id, Some(actor_id), &period))
        .await;

    Ok(period)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let update_map = params.into_update_map();
    let existing = client_activity_period::find_by_id(db, id).await?;

    let start_date = date_in(&update_map, "start_date").unwrap_or(existing.start_date);
    let end_date = date_in(&update_map, "end_date").or(existing.end_date);
    validate_dates(start_date, end_date)?;

    let txn = lock_client(db, existing.client_id).await?;
    ensure_no_overlap(&txn, existing.client_id, start_date, end_date, Some(id)).await?;
    let period = client_activity_period::update(&txn, id, update_map).await?;
    commit(txn).await?;

    publisher
        .publish(DomainEvent::updated(TABLE, period.id, Some(actor_id), &period))
        .await;

    Ok(period)
}

/// Closes a running (or reschedules the end of a closed) period.
pub async fn end(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    end_date: NaiveDate,
) -> Result<Model, Error> {
    let existing = client_activity_period::find_by_id(db, id).await?;
    validate_dates(existing.start_date, Some(end_date))?;

    let txn = lock_client(db, existing.client_id).await?;
    ensure_no_overlap(
        &txn,
        existing.client_id,
        existing.start_date,
        Some(end_date),
        Some(id),
    )
    .await?;
    let period = client_activity_period::end(&txn, id, end_date).await?;
    commit(txn).await?;

    publisher
        .publish(DomainEvent::updated(TABLE, period.id, Some(actor_id), &period))
        .await;

    Ok(period)
}

pub async fn delete(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<(), Error> {
    client_activity_period::delete(db, id).await?;
    publisher
        .publish(DomainEvent::deleted(TABLE, id, Some(actor_id)))
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn end_date_may_not_precede_start_date() {
        assert!(validate_dates(day(10), Some(day(9))).is_err());
        assert!(validate_dates(day(10), Some(day(10))).is_ok());
        assert!(validate_dates(day(10), None).is_ok());
    }

    #[test]
    fn date_in_reads_dates_from_the_update_map() {
        let mut update_map = UpdateMap::new();
        update_map.insert("end_date".to_string(), Some(Value::from(day(30))));

        assert_eq!(date_in(&update_map, "end_date"), Some(day(30)));
        assert_eq!(date_in(&update_map, "start_date"), None);
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use entity::client_status::ClientStatus;
    use entity::{clients, coaches};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    struct Fixture {
        client: clients::Model,
        coach: coaches::Model,
    }

    fn fixture() -> Fixture {
        let now = chrono::Utc::now();
        let coach = coaches::Model {
            id: Id::new_v4(),
            user_id: None,
            coach_team_id: None,
            first_name: "Jordan".to_string(),
            last_name: "Reyes".to_string(),
            email: "jordan@example.com".to_string(),
            phone: None,
            specialties: vec![],
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };
        let client = clients::Model {
            id: Id::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            status: ClientStatus::Active,
            coach_id: Some(coach.id),
            tags: vec![],
            notes: None,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };
        Fixture { client, coach }
    }

    fn period(fixture: &Fixture, start: NaiveDate, end: Option<NaiveDate>) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            client_id: fixture.client.id,
            coach_id: fixture.coach.id,
            payment_plan_id: None,
            start_date: start,
            end_date: end,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn create_persists_a_period_for_an_existing_client_and_coach() -> Result<(), Error> {
        let fixture = fixture();
        let new_period = period(&fixture, day(1), Some(day(30)));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixture.client.clone()]])
            .append_query_results([[fixture.coach.clone()]])
            .append_query_results([Vec::<Model>::new()])
            .append_query_results([[new_period.clone()]])
            .into_connection();

        let created = create(&db, &EventPublisher::new(), Id::new_v4(), new_period.clone()).await?;

        assert_eq!(created.client_id, fixture.client.id);
        assert_eq!(created.coach_id, fixture.coach.id);
        assert_eq!(created.start_date, day(1));
        assert_eq!(created.end_date, Some(day(30)));
        Ok(())
    }

    #[tokio::test]
    async fn create_checks_overlaps_under_the_client_row_lock() -> Result<(), Error> {
        let fixture = fixture();
        let new_period = period(&fixture, day(1), Some(day(30)));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixture.client.clone()]])
            .append_query_results([[fixture.coach.clone()]])
            .append_query_results([Vec::<Model>::new()])
            .append_query_results([[new_period.clone()]])
            .into_connection();

        create(&db, &EventPublisher::new(), Id::new_v4(), new_period).await?;

        let log = format!("{:?}", db.into_transaction_log());
        let lock = log.find("FOR UPDATE").unwrap();
        let insert = log.find("INSERT INTO").unwrap();
        assert!(log[..lock].contains("clients"));
        assert!(log[lock..insert].contains("client_activity_periods"));
        assert!(log[insert..].contains("COMMIT"));
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_an_overlapping_period() {
        let fixture = fixture();
        let open_ended = period(&fixture, day(1), None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixture.client.clone()]])
            .append_query_results([[fixture.coach.clone()]])
            .append_query_results([[open_ended]])
            .into_connection();

        let result = create(
            &db,
            &EventPublisher::new(),
            Id::new_v4(),
            period(&fixture, day(20), Some(day(25))),
        )
        .await;

        assert!(matches!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Validation(_)
        ));
    }

    #[tokio::test]
    async fn create_reports_a_missing_coach_as_invalid_input() {
        let fixture = fixture();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[fixture.client.clone()]])
            .append_query_results([Vec::<coaches::Model>::new()])
            .into_connection();

        let result = create(
            &db,
            &EventPublisher::new(),
            Id::new_v4(),
            period(&fixture, day(1), None),
        )
        .await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Validation("coach_id: does not exist".to_string())
        );
    }

    #[tokio::test]
    async fn delete_of_a_missing_period_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete(&db, &EventPublisher::new(), Id::new_v4(), Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
    }
}
