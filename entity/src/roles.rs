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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role")]
pub enum Role {
    #[sea_orm(string_value = "staff")]
    #[default]
    Staff,
    #[sea_orm(string_value = "finance")]
    Finance,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Roles allowed to see finance dashboards and mutate money records.
    pub fn can_manage_finances(&self) -> bool {
        matches!(self, Role::Admin | Role::Finance)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Staff => write!(fmt, "staff"),
            Role::Finance => write!(fmt, "finance"),
            Role::Admin => write!(fmt, "admin"),
        }
    }
}
