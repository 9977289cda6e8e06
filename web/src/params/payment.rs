use sea_orm::Order;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use super::sort::SortOrder;
use super::WithSortDefaults;
use domain::payment_method::PaymentMethod;
use domain::{payments, Id, IntoQueryFilterMap, QueryFilterMap, QuerySort};

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "paid_at")]
pub(crate) enum SortField {
    #[serde(rename = "paid_at")]
    PaidAt,
    #[serde(rename = "amount_cents")]
    AmountCents,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) client_id: Option<Id>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) payment_plan_id: Option<Id>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) payment_slot_id: Option<Id>,
    pub(crate) method: Option<PaymentMethod>,
    pub(crate) sort_by: Option<SortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert_some("client_id", self.client_id);
        query_filter_map.insert_some("payment_plan_id", self.payment_plan_id);
        query_filter_map.insert_some("payment_slot_id", self.payment_slot_id);
        query_filter_map.insert_some("method", self.method);
        query_filter_map
    }
}

impl QuerySort<payments::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<payments::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::PaidAt => payments::Column::PaidAt,
            SortField::AmountCents => payments::Column::AmountCents,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

impl WithSortDefaults for IndexParams {
    type SortField = SortField;
}
