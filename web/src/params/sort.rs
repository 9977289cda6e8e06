use sea_orm::Order;
use serde::Deserialize;
use utoipa::ToSchema;

/// Sort order accepted by every index endpoint
#[derive(Debug, Deserialize, ToSchema, Clone)]
#[schema(example = "desc")]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl From<&SortOrder> for Order {
    fn from(order: &SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}
