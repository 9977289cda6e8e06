use crate::payment_frequency::PaymentFrequency;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A coaching package sold to a client, paid in one or more installments.
#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema, Validate,
)]
#[schema(as = entity::payment_plans::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "payment_plans")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub client_id: Id,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 1, message = "must be a positive amount of cents"))]
    pub total_amount_cents: i64,
    #[serde(default)]
    #[validate(length(equal = 3, message = "must be an ISO 4217 currency code"))]
    pub currency: String,
    #[validate(range(min = 1, max = 120))]
    pub installment_count: i32,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[schema(value_type = String, format = Date)]
    pub start_date: Date,
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
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Clients,
    #[sea_orm(has_many = "super::payment_slots::Entity")]
    PaymentSlots,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::payment_slots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentSlots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
