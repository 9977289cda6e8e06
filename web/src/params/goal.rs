use chrono::NaiveDate;
use sea_orm::Order;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::sort::SortOrder;
use super::WithSortDefaults;
use domain::goal_status::GoalStatus;
use domain::{goals, Id, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, QuerySort, UpdateMap};

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "due_date")]
pub(crate) enum SortField {
    #[serde(rename = "title")]
    Title,
    #[serde(rename = "due_date")]
    DueDate,
    #[serde(rename = "created_at")]
    CreatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) client_id: Option<Id>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) goal_type_id: Option<Id>,
    pub(crate) status: Option<GoalStatus>,
    pub(crate) sort_by: Option<SortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert_some("client_id", self.client_id);
        query_filter_map.insert_some("goal_type_id", self.goal_type_id);
        query_filter_map.insert_some("status", self.status);
        query_filter_map
    }
}

impl QuerySort<goals::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<goals::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::Title => goals::Column::Title,
            SortField::DueDate => goals::Column::DueDate,
            SortField::CreatedAt => goals::Column::CreatedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

impl WithSortDefaults for IndexParams {
    type SortField = SortField;
}

/// Status changes go through the status endpoint so `completed_at` stays consistent.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateParams {
    #[schema(value_type = Option<Uuid>)]
    pub goal_type_id: Option<Id>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub target_value: Option<i64>,
    #[validate(range(min = 0))]
    pub current_value: Option<i64>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("goal_type_id", self.goal_type_id);
        update_map.insert_some("title", self.title);
        update_map.insert_some("description", self.description);
        update_map.insert_some("target_value", self.target_value);
        update_map.insert_some("current_value", self.current_value);
        update_map.insert_some("due_date", self.due_date);
        update_map
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct StatusParams {
    pub(crate) value: GoalStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct TypeIndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) goal_category_id: Option<Id>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct CategoryUpdateParams {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl IntoUpdateMap for CategoryUpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("name", self.name);
        update_map.insert_some("description", self.description);
        update_map
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct TypeUpdateParams {
    #[schema(value_type = Option<Uuid>)]
    pub goal_category_id: Option<Id>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 40))]
    pub unit: Option<String>,
}

impl IntoUpdateMap for TypeUpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("goal_category_id", self.goal_category_id);
        update_map.insert_some("name", self.name);
        update_map.insert_some("unit", self.unit);
        update_map
    }
}
