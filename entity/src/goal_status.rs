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
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "goal_status")]
pub enum GoalStatus {
    #[sea_orm(string_value = "not_started")]
    #[default]
    NotStarted,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "abandoned")]
    Abandoned,
}

impl From<&str> for GoalStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "abandoned" => Self::Abandoned,
            _ => Self::NotStarted,
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalStatus::NotStarted => write!(fmt, "not_started"),
            GoalStatus::InProgress => write!(fmt, "in_progress"),
            GoalStatus::Completed => write!(fmt, "completed"),
            GoalStatus::Abandoned => write!(fmt, "abandoned"),
        }
    }
}
