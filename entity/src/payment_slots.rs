use crate::payment_slot_status::PaymentSlotStatus;
use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One scheduled installment of a payment plan.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::payment_slots::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "payment_slots")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub payment_plan_id: Id,
    /// 1-based position of the installment within its plan
    pub sequence: i32,
    #[schema(value_type = String, format = Date)]
    pub due_date: Date,
    pub amount_due_cents: i64,
    #[serde(default)]
    pub status: PaymentSlotStatus,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub paid_at: Option<DateTimeWithTimeZone>,
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
        belongs_to = "super::payment_plans::Entity",
        from = "Column::PaymentPlanId",
        to = "super::payment_plans::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    PaymentPlans,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
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

impl ActiveModelBehavior for ActiveModel {}
