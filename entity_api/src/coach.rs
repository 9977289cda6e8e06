use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::table::TableSchema;
use entity::coaches::{ActiveModel, Column, Entity, Model, Relation};
use entity::{coach_teams, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, Order, QueryOrder,
    Value,
};

use log::*;

pub async fn create(db: &impl ConnectionTrait, coach_model: Model) -> Result<Model, Error> {
    debug!("New Coach Model to be inserted: {coach_model:?}");

    let now = chrono::Utc::now();

    let coach_active_model: ActiveModel = ActiveModel {
        user_id: Set(coach_model.user_id),
        coach_team_id: Set(coach_model.coach_team_id),
        first_name: Set(coach_model.first_name),
        last_name: Set(coach_model.last_name),
        email: Set(coach_model.email.to_lowercase()),
        phone: Set(coach_model.phone),
        specialties: Set(coach_model.specialties),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(coach_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

/// Coaches belonging to a team, active ones first.
pub async fn find_by_team(db: &impl ConnectionTrait, coach_team_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CoachTeamId.eq(coach_team_id))
        .order_by_desc(Column::IsActive)
        .order_by_asc(Column::LastName)
        .all(db)
        .await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let coach = find_by_id(db, id).await?;
    debug!("Existing Coach model to be Updated: {coach:?}");

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, coach.into_active_model(), update_map).await
}

pub async fn deactivate(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let mut update_map = UpdateMap::new();
    update_map.insert("is_active".to_string(), Some(Value::from(false)));
    update(db, id, update_map).await
}

pub fn table_schema() -> TableSchema<Entity> {
    TableSchema::new(Column::LastName, Order::Asc)
        .join(|| Relation::CoachTeams.def())
        .text("first_name", Column::FirstName)
        .text("last_name", Column::LastName)
        .text("email", Column::Email)
        .option("coach_team_id", Column::CoachTeamId)
        .text("team_name", coach_teams::Column::Name)
        .multi_option("specialties", Column::Specialties)
        .option("is_active", Column::IsActive)
        .date("created_at", Column::CreatedAt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{apply, ColumnFilter, FilterOperator, FilterType};
    use sea_orm::{DbBackend, QueryTrait};
    use serde_json::json;

    #[test]
    fn team_name_filter_joins_coach_teams() {
        let filters = vec![ColumnFilter {
            column_id: "team_name".to_string(),
            filter_type: FilterType::Text,
            operator: FilterOperator::Contains,
            values: vec![json!("north")],
        }];

        let sql = apply(Entity::find(), &table_schema(), &filters, None)
            .unwrap()
            .build(DbBackend::Postgres)
            .sql;

        assert!(sql.contains(r#"LEFT JOIN "backoffice"."coach_teams""#));
        assert!(sql.contains(r#""coach_teams"."name" ILIKE $1"#));
    }
}
