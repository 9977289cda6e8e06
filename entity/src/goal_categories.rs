use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema, Validate,
)]
#[schema(as = entity::goal_categories::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "goal_categories")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[validate(length(min = 1, max = 80))]
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::goal_types::Entity")]
    GoalTypes,
}

impl Related<super::goal_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
