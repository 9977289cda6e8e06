use crate::coach_payment_status::CoachPaymentStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A payout owed to, or paid to, a coach for a period of work.
#[derive(
    Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema, Validate,
)]
#[schema(as = entity::coach_payments::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "coach_payments")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub coach_id: Id,
    /// Client the payout relates to, when it is for a single engagement
    #[schema(value_type = Option<uuid::Uuid>)]
    pub client_id: Option<Id>,
    #[validate(range(min = 1, message = "must be a positive amount of cents"))]
    pub amount_cents: i64,
    #[serde(default)]
    #[validate(length(equal = 3, message = "must be an ISO 4217 currency code"))]
    pub currency: String,
    #[schema(value_type = String, format = Date)]
    pub period_start: Date,
    #[schema(value_type = String, format = Date)]
    pub period_end: Date,
    #[serde(default)]
    pub status: CoachPaymentStatus,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub notes: Option<String>,
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
        belongs_to = "super::coaches::Entity",
        from = "Column::CoachId",
        to = "super::coaches::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Coaches,
}

impl Related<super::coaches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coaches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
