use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How often the installments of a payment plan fall due.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    EnumIter,
    Deserialize,
    Default,
    Serialize,
    DeriveActiveEnum,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_frequency")]
pub enum PaymentFrequency {
    #[sea_orm(string_value = "one_time")]
    OneTime,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "biweekly")]
    Biweekly,
    #[sea_orm(string_value = "monthly")]
    #[default]
    Monthly,
}

impl std::fmt::Display for PaymentFrequency {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentFrequency::OneTime => write!(fmt, "one_time"),
            PaymentFrequency::Weekly => write!(fmt, "weekly"),
            PaymentFrequency::Biweekly => write!(fmt, "biweekly"),
            PaymentFrequency::Monthly => write!(fmt, "monthly"),
        }
    }
}
