use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema, Validate,
)]
#[schema(as = entity::coach_teams::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "coach_teams")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[validate(length(min = 1, max = 120))]
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    /// Coach leading the team, when one has been appointed
    #[schema(value_type = Option<uuid::Uuid>)]
    pub team_leader_id: Option<Id>,
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
    #[sea_orm(has_many = "super::coaches::Entity")]
    Members,
    #[sea_orm(
        belongs_to = "super::coaches::Entity",
        from = "Column::TeamLeaderId",
        to = "super::coaches::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    TeamLeader,
}

impl Related<super::coaches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
