use crate::goal_status::GoalStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A measurable objective a client is working towards.
#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema, Validate,
)]
#[schema(as = entity::goals::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "goals")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub client_id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub goal_type_id: Id,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub target_value: Option<i64>,
    pub current_value: Option<i64>,
    #[serde(default)]
    pub status: GoalStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<Date>,
    #[serde(skip_deserializing)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub completed_at: Option<DateTimeWithTimeZone>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Clients,
    #[sea_orm(
        belongs_to = "super::goal_types::Entity",
        from = "Column::GoalTypeId",
        to = "super::goal_types::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    GoalTypes,
    #[sea_orm(has_many = "super::wins::Entity")]
    Wins,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::goal_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalTypes.def()
    }
}

impl Related<super::wins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
