//! Subscriptions mirrored from the billing provider into the `billing` schema.
//! The back office only ever reads this table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::billing_subscriptions::Model)]
#[sea_orm(schema_name = "billing", table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_id: String,
    pub customer_email: Option<String>,
    /// Provider status: active, trialing, past_due, canceled, unpaid, incomplete
    pub status: String,
    pub unit_amount_cents: i64,
    pub currency: String,
    /// Billing interval: day, week, month or year
    pub interval: String,
    pub interval_count: i32,
    pub quantity: i32,
    #[schema(value_type = String, format = DateTime)]
    pub current_period_start: DateTimeWithTimeZone,
    #[schema(value_type = String, format = DateTime)]
    pub current_period_end: DateTimeWithTimeZone,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub canceled_at: Option<DateTimeWithTimeZone>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Statuses that still produce recurring revenue.
    pub fn is_revenue_generating(&self) -> bool {
        matches!(self.status.as_str(), "active" | "past_due")
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
