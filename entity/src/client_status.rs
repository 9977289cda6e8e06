use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where a client stands in the coaching lifecycle.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "client_status")]
pub enum ClientStatus {
    #[sea_orm(string_value = "lead")]
    #[default]
    Lead,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "churned")]
    Churned,
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientStatus::Lead => write!(fmt, "lead"),
            ClientStatus::Active => write!(fmt, "active"),
            ClientStatus::Paused => write!(fmt, "paused"),
            ClientStatus::Churned => write!(fmt, "churned"),
        }
    }
}
