use sea_orm::Order;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::sort::SortOrder;
use super::WithSortDefaults;
use domain::{
    coaches, Id, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, QuerySort, UpdateMap,
};

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "last_name")]
pub(crate) enum SortField {
    #[serde(rename = "last_name")]
    LastName,
    #[serde(rename = "created_at")]
    CreatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) coach_team_id: Option<Id>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) user_id: Option<Id>,
    pub(crate) is_active: Option<bool>,
    pub(crate) sort_by: Option<SortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert_some("coach_team_id", self.coach_team_id);
        query_filter_map.insert_some("user_id", self.user_id);
        query_filter_map.insert_some("is_active", self.is_active);
        query_filter_map
    }
}

impl QuerySort<coaches::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<coaches::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::LastName => coaches::Column::LastName,
            SortField::CreatedAt => coaches::Column::CreatedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

impl WithSortDefaults for IndexParams {
    type SortField = SortField;
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateParams {
    #[schema(value_type = Option<Uuid>)]
    pub user_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub coach_team_id: Option<Id>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub specialties: Option<Vec<String>>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("user_id", self.user_id);
        update_map.insert_some("coach_team_id", self.coach_team_id);
        update_map.insert_some("first_name", self.first_name);
        update_map.insert_some("last_name", self.last_name);
        update_map.insert_some("email", self.email.map(|email| email.to_lowercase()));
        update_map.insert_some("phone", self.phone);
        update_map.insert_some("specialties", self.specialties);
        update_map
    }
}
