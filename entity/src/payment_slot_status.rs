use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "payment_slot_status"
)]
pub enum PaymentSlotStatus {
    /// Not yet due or due today
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Past its due date without being paid
    #[sea_orm(string_value = "overdue")]
    Overdue,
    /// Forgiven; no longer expected to be paid
    #[sea_orm(string_value = "waived")]
    Waived,
}

impl PaymentSlotStatus {
    /// Whether money is still expected for a slot in this status.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, PaymentSlotStatus::Pending | PaymentSlotStatus::Overdue)
    }
}

impl std::fmt::Display for PaymentSlotStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentSlotStatus::Pending => write!(fmt, "pending"),
            PaymentSlotStatus::Paid => write!(fmt, "paid"),
            PaymentSlotStatus::Overdue => write!(fmt, "overdue"),
            PaymentSlotStatus::Waived => write!(fmt, "waived"),
        }
    }
}
