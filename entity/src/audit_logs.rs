//! SeaORM Entity for the audit_logs table.
//! Rows are append-only; one is written for every mutation made through the domain layer.

use crate::audit_action::AuditAction;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::audit_logs::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    /// User who performed the change; `None` for system initiated changes
    #[schema(value_type = Option<uuid::Uuid>)]
    pub actor_id: Option<Id>,
    pub action: AuditAction,
    pub table_name: String,
    #[schema(value_type = uuid::Uuid)]
    pub record_id: Id,
    #[schema(value_type = Object)]
    pub changes: Json,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ActorId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
