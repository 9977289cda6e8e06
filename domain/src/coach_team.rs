use crate::coach_teams::Model;
use crate::error::Error;
use crate::{Id, IntoUpdateMap};
use entity_api::coach_team;
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::coach_team::{find_all, find_by_id, members, summary, CoachTeamSummary};

const TABLE: &str = "coach_teams";

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    coach_team_model: Model,
) -> Result<Model, Error> {
    coach_team_model.validate()?;

    let coach_team = coach_team::create(db, coach_team_model).await?;
    publisher
        .publish(DomainEvent::created(
            TABLE,
            coach_team.id,
            Some(actor_id),
            &coach_team,
        ))
        .await;

    Ok(coach_team)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let coach_team = coach_team::update(db, id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(
            TABLE,
            coach_team.id,
            Some(actor_id),
            &coach_team,
        ))
        .await;

    Ok(coach_team)
}

pub async fn deactivate(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
) -> Result<Model, Error> {
    let coach_team = coach_team::deactivate(db, id).await?;
    publisher
        .publish(DomainEvent::updated(
            TABLE,
            coach_team.id,
            Some(actor_id),
            &coach_team,
        ))
        .await;

    Ok(coach_team)
}
