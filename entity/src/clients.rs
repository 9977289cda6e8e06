use crate::client_status::ClientStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A person being coached.
#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema, Validate,
)]
#[schema(as = entity::clients::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "clients")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub status: ClientStatus,
    /// Coach currently responsible for the client
    #[schema(value_type = Option<uuid::Uuid>)]
    pub coach_id: Option<Id>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
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
        belongs_to = "super::coaches::Entity",
        from = "Column::CoachId",
        to = "super::coaches::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Coaches,
    #[sea_orm(has_many = "super::payment_plans::Entity")]
    PaymentPlans,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
    #[sea_orm(has_many = "super::goals::Entity")]
    Goals,
    #[sea_orm(has_many = "super::wins::Entity")]
    Wins,
    #[sea_orm(has_many = "super::client_activity_periods::Entity")]
    ClientActivityPeriods,
}

impl Related<super::coaches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coaches.def()
    }
}

impl Related<super::payment_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentPlans.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goals.def()
    }
}

impl Related<super::wins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wins.def()
    }
}

impl Related<super::client_activity_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClientActivityPeriods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
