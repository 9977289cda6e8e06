use sea_orm::Order;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::sort::SortOrder;
use super::WithSortDefaults;
use domain::{
    payment_plans, Id, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, QuerySort, UpdateMap,
};

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "start_date")]
pub(crate) enum SortField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "start_date")]
    StartDate,
    #[serde(rename = "created_at")]
    CreatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) client_id: Option<Id>,
    pub(crate) is_active: Option<bool>,
    pub(crate) sort_by: Option<SortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert_some("client_id", self.client_id);
        query_filter_map.insert_some("is_active", self.is_active);
        query_filter_map
    }
}

impl QuerySort<payment_plans::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<payment_plans::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::Name => payment_plans::Column::Name,
            SortField::StartDate => payment_plans::Column::StartDate,
            SortField::CreatedAt => payment_plans::Column::CreatedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

impl WithSortDefaults for IndexParams {
    type SortField = SortField;
}

/// Only descriptive fields change after creation; amounts and schedule are fixed
/// once the slots exist.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateParams {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("name", self.name);
        update_map
    }
}
