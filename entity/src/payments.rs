use crate::payment_method::PaymentMethod;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Money received from a client, optionally settling a payment slot.
#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema, Validate,
)]
#[schema(as = entity::payments::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "payments")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub client_id: Id,
    #[schema(value_type = Option<uuid::Uuid>)]
    pub payment_plan_id: Option<Id>,
    #[schema(value_type = Option<uuid::Uuid>)]
    pub payment_slot_id: Option<Id>,
    #[validate(range(min = 1, message = "must be a positive amount of cents"))]
    pub amount_cents: i64,
    #[serde(default)]
    #[validate(length(equal = 3, message = "must be an ISO 4217 currency code"))]
    pub currency: String,
    #[serde(default)]
    pub method: PaymentMethod,
    #[schema(value_type = String, format = DateTime)]
    pub paid_at: DateTimeWithTimeZone,
    pub reference: Option<String>,
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
        belongs_to = "super::payment_slots::Entity",
        from = "Column::PaymentSlotId",
        to = "super::payment_slots::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
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
