use super::error::Error;
use crate::mutate::{self, UpdateMap};
use crate::{client, coach};
use entity::coach_teams::{ActiveModel, Column, Entity, Model};
use entity::{coaches, Id};
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, ConnectionTrait, IntoActiveModel, QueryOrder, Value,
};
use serde::Serialize;
use utoipa::ToSchema;

use log::*;

/// A team with the head counts shown on the team overview.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CoachTeamSummary {
    #[serde(flatten)]
    pub team: Model,
    pub member_count: u64,
    pub active_member_count: u64,
    pub active_client_count: u64,
}

pub async fn create(db: &impl ConnectionTrait, coach_team_model: Model) -> Result<Model, Error> {
    debug!("New Coach Team Model to be inserted: {coach_team_model:?}");

    let now = chrono::Utc::now();

    let coach_team_active_model: ActiveModel = ActiveModel {
        name: Set(coach_team_model.name),
        description: Set(coach_team_model.description),
        team_leader_id: Set(coach_team_model.team_leader_id),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(coach_team_active_model.insert(db).await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_all(db: &impl ConnectionTrait, include_inactive: bool) -> Result<Vec<Model>, Error> {
    let mut query = Entity::find();
    if !include_inactive {
        query = query.filter(Column::IsActive.eq(true));
    }
    Ok(query.order_by_asc(Column::Name).all(db).await?)
}

pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let coach_team = find_by_id(db, id).await?;
    debug!("Existing Coach Team model to be Updated: {coach_team:?}");

    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, coach_team.into_active_model(), update_map).await
}

pub async fn deactivate(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    let mut update_map = UpdateMap::new();
    update_map.insert("is_active".to_string(), Some(Value::from(false)));
    update(db, id, update_map).await
}

pub async fn members(db: &impl ConnectionTrait, id: Id) -> Result<Vec<coaches::Model>, Error> {
    // Surface NotFound for unknown teams instead of an empty list
    find_by_id(db, id).await?;
    coach::find_by_team(db, id).await
}

pub async fn summary(db: &impl ConnectionTrait, id: Id) -> Result<CoachTeamSummary, Error> {
    let team = find_by_id(db, id).await?;
    let members = coach::find_by_team(db, id).await?;

    let active_ids: Vec<Id> = members
        .iter()
        .filter(|coach| coach.is_active)
        .map(|coach| coach.id)
        .collect();
    let active_member_count = active_ids.len() as u64;
    let active_client_count = client::count_active_by_coaches(db, active_ids).await?;

    Ok(CoachTeamSummary {
        team,
        member_count: members.len() as u64,
        active_member_count,
        active_client_count,
    })
}
