use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle of a payout owed to a coach.
#[derive(
    Debug,
    Clone,
    Eq,
    PartialEq,
    Hash,
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
    enum_name = "coach_payment_status"
)]
pub enum CoachPaymentStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "void")]
    Void,
}

impl From<&str> for CoachPaymentStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "approved" => Self::Approved,
            "paid" => Self::Paid,
            "void" => Self::Void,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for CoachPaymentStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoachPaymentStatus::Pending => write!(fmt, "pending"),
            CoachPaymentStatus::Approved => write!(fmt, "approved"),
            CoachPaymentStatus::Paid => write!(fmt, "paid"),
            CoachPaymentStatus::Void => write!(fmt, "void"),
        }
    }
}
