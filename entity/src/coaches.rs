use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A coach (team member) delivering coaching to clients.
#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema, Validate,
)]
#[schema(as = entity::coaches::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "coaches")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    /// Back-office login belonging to this coach, if any
    #[schema(value_type = Option<uuid::Uuid>)]
    pub user_id: Option<Id>,
    #[schema(value_type = Option<uuid::Uuid>)]
    pub coach_team_id: Option<Id>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

fn default_true() -> bool {
    true
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::coach_teams::Entity",
        from = "Column::CoachTeamId",
        to = "super::coach_teams::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    CoachTeams,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Users,
    #[sea_orm(has_many = "super::clients::Entity")]
    Clients,
    #[sea_orm(has_many = "super::coach_payments::Entity")]
    CoachPayments,
    #[sea_orm(has_many = "super::client_activity_periods::Entity")]
    ClientActivityPeriods,
}

impl Related<super::coach_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoachTeams.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::coach_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoachPayments.def()
    }
}

impl Related<super::client_activity_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientActivityPeriods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
