use crate::error::Error;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Iterable, Order, QueryFilter, QueryOrder, Value,
};
use std::collections::HashMap;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are filter parameter names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("client_id".to_string(), Some(Value::String(Some(Box::new("a_client_id".to_string())))));
/// let filter_value = query_filter_map.get("client_id");
/// assert!(filter_value.is_some());
/// ```
#[derive(Debug, Default)]
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }

    /// Inserts `value` under `key` only when it is present.
    pub fn insert_some<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.map.insert(key.to_string(), Some(value.into()));
        }
    }
}

/// `IntoQueryFilterMap` converts typed request parameters into a `QueryFilterMap`.
///
/// # Example
///
/// ```
/// use entity_api::QueryFilterMap;
/// use entity_api::IntoQueryFilterMap;
///
/// #[derive(Debug)]
/// struct MyParams {
///     client_id: String,
/// }
///
/// impl IntoQueryFilterMap for MyParams {
///     fn into_query_filter_map(self) -> QueryFilterMap {
///         let mut query_filter_map = QueryFilterMap::new();
///         query_filter_map.insert(
///             "client_id".to_string(),
///             Some(sea_orm::Value::String(Some(Box::new(self.client_id)))),
///         );
///         query_filter_map
///     }
/// }
/// ```
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Optional ordering carried by index parameters.
pub trait QuerySort<C: ColumnTrait> {
    fn get_sort_column(&self) -> Option<C>;
    fn get_sort_order(&self) -> Option<Order>;
}

/// Find all records of an entity by the given query filter map, ordered by the
/// sort column and order the params carry (if both are present).
pub async fn find_by<E, C, P>(db: &impl ConnectionTrait, params: P) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait<Column = C>,
    C: ColumnTrait,
    P: IntoQueryFilterMap + QuerySort<C>,
{
    let sort = (params.get_sort_column(), params.get_sort_order());
    let query_filter_map = params.into_query_filter_map();
    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    if let (Some(column), Some(order)) = sort {
        query = query.order_by(column, order);
    }

    Ok(query.all(db).await?)
}
