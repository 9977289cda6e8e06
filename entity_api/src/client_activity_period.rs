use super::error::Error;
use crate::mutate::{self, UpdateMap};
use entity::client_activity_periods::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*, sea_query::Expr, ActiveValue::Set, Condition, ConnectionTrait,
    IntoActiveModel, QueryOrder, QuerySelect, Value,
};

use log::*;

pub async fn create(db: &impl ConnectionTrait, period_model: Model) -> Result<Model, Error> {
    debug!("New Client Activity Period Model to be inserted: {period_model:?}");

    let now = chrono::Utc::now();

    let period_active_model: ActiveModel = ActiveModel {
        client_id: Set(period_model.client_id),
        coach_id: Set(period_model.coach_id),
        payment_plan_id: Set(period_model.payment_plan_id),
        start_date: Set(period_model.start_date),
        end_date: Set(period_model.end_date),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(period_active_model.insert(db).await?)
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
        .order_by_desc(Column::StartDate)
        .all(db)
        .await?)
}

pub async fn find_by_coach(db: &impl ConnectionTrait, coach_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CoachId.eq(coach_id))
        .order_by_desc(Column::StartDate)
        .all(db)
        .await?)
}

/// Matches periods that cover any day of `[start, end]`; an open end extends indefinitely.
fn overlapping(start: Date, end: Option<Date>) -> Condition {
    let mut condition = Condition::all().add(
        Condition::any()
            .add(Column::EndDate.is_null())
            .add(Column::EndDate.gte(start)),
    );
    if let Some(end) = end {
        condition = condition.add(Column::StartDate.lte(end));
    }
    condition
}

/// Periods of `client_id` overlapping `[start, end]`, ignoring `exclude_id`.
pub async fn find_overlapping(
    db: &impl ConnectionTrait,
    client_id: Id,
    start: Date,
    end: Option<Date>,
    exclude_id: Option<Id>,
) -> Result<Vec<Model>, Error> {
    let mut query = Entity::find()
        .filter(Column::ClientId.eq(client_id))
        .filter(overlapping(start, end));
    if let Some(exclude_id) = exclude_id {
        query = query.filter(Column::Id.ne(exclude_id));
    }
    Ok(query.order_by_asc(Column::StartDate).all(db).await?)
}

pub async fn find_active_on(db: &impl ConnectionTrait, day: Date) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(overlapping(day, Some(day)))
        .order_by_asc(Column::StartDate)
        .all(db)
        .await?)
}

/// Number of distinct clients with a period overlapping `[start, end]`.
pub async fn count_active_clients(
    db: &impl ConnectionTrait,
    start: Date,
    end: Date,
) -> Result<i64, Error> {
    let count: Option<i64> = Entity::find()
        .select_only()
        .column_as(Expr::col(Column::ClientId).count_distinct(), "active_clients")
        .filter(overlapping(start, Some(end)))
        .into_tuple()
        .one(db)
        .await?;
    Ok(count.unwrap_or(0))
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let period = find_by_id(db, id).await?;
    debug!("Existing Client Activity Period model to be Updated: {period:?}");

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, period.into_active_model(), update_map).await
}

/// Closes the period on `end_date`.
pub async fn end(db: &impl ConnectionTrait, id: Id, end_date: Date) -> Result<Model, Error> {
    let period = find_by_id(db, id).await?;
    let mut active_model = period.into_active_model();
    active_model.end_date = Set(Some(end_date));
    active_model.updated_at = Set(chrono::Utc::now().into());
    Ok(active_model.update(db).await?)
}

pub async fn delete(db: &impl ConnectionTrait, id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found());
    }
    Ok(())
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::BTreeMap;

    fn period(start: NaiveDate, end: Option<NaiveDate>) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            client_id: Id::new_v4(),
            coach_id: Id::new_v4(),
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
    async fn create_returns_the_persisted_period() -> Result<(), Error> {
        let model = period(day(1), Some(day(30)));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model.clone()]])
            .into_connection();

        let created = create(&db, model.clone()).await?;

        assert_eq!(created, model);
        Ok(())
    }

    #[tokio::test]
    async fn delete_of_a_missing_period_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn find_overlapping_excludes_the_period_being_updated() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let client_id = Id::new_v4();
        let exclude_id = Id::new_v4();
        find_overlapping(&db, client_id, day(1), None, Some(exclude_id)).await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"\"end_date\" IS NULL OR"#));
        assert!(log.contains(r#"\"client_activity_periods\".\"id\" <> $"#));
        assert!(!log.contains(r#"\"start_date\" <= $"#));
        Ok(())
    }

    #[tokio::test]
    async fn count_active_clients_reads_the_distinct_count() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([(
                "active_clients",
                sea_orm::Value::BigInt(Some(7)),
            )])]])
            .into_connection();

        assert_eq!(count_active_clients(&db, day(1), day(30)).await?, 7);
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("COUNT(DISTINCT"));
        Ok(())
    }
}
