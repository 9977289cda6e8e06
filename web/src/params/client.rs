use sea_orm::Order;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::sort::SortOrder;
use super::WithSortDefaults;
use domain::client_status::ClientStatus;
use domain::{
    clients, Id, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, QuerySort, UpdateMap,
};

/// Sortable fields for clients
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "last_name")]
pub(crate) enum SortField {
    #[serde(rename = "last_name")]
    LastName,
    #[serde(rename = "created_at")]
    CreatedAt,
    #[serde(rename = "updated_at")]
    UpdatedAt,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) coach_id: Option<Id>,
    pub(crate) status: Option<ClientStatus>,
    pub(crate) is_active: Option<bool>,
    pub(crate) sort_by: Option<SortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert_some("coach_id", self.coach_id);
        query_filter_map.insert_some("status", self.status);
        query_filter_map.insert_some("is_active", self.is_active);
        query_filter_map
    }
}

impl QuerySort<clients::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<clients::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::LastName => clients::Column::LastName,
            SortField::CreatedAt => clients::Column::CreatedAt,
            SortField::UpdatedAt => clients::Column::UpdatedAt,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

impl WithSortDefaults for IndexParams {
    type SortField = SortField;
}

/// Partial update of a client; absent fields keep their value.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateParams {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    pub status: Option<ClientStatus>,
    #[schema(value_type = Option<Uuid>)]
    pub coach_id: Option<Id>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("first_name", self.first_name);
        update_map.insert_some("last_name", self.last_name);
        update_map.insert_some("email", self.email.map(|email| email.to_lowercase()));
        update_map.insert_some("phone", self.phone);
        update_map.insert_some("status", self.status);
        update_map.insert_some("coach_id", self.coach_id);
        update_map.insert_some("tags", self.tags);
        update_map.insert_some("notes", self.notes);
        update_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Value;

    #[test]
    fn update_map_only_carries_present_fields() {
        let params = UpdateParams {
            email: Some("Ada@Example.com".to_string()),
            status: Some(ClientStatus::Paused),
            ..Default::default()
        };

        let update_map = params.into_update_map();

        assert_eq!(
            update_map.get("email"),
            Some(&Value::String(Some(Box::new("ada@example.com".to_string()))))
        );
        assert!(update_map.get("status").is_some());
        assert!(update_map.get("first_name").is_none());
        assert!(update_map.get("tags").is_none());
    }

    #[test]
    fn invalid_email_fails_validation() {
        let params = UpdateParams {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn index_params_filter_on_given_columns() {
        let coach_id = Id::new_v4();
        let params = IndexParams {
            coach_id: Some(coach_id),
            status: None,
            is_active: Some(true),
            sort_by: None,
            sort_order: None,
        };

        let filters = params.into_query_filter_map();

        assert_eq!(filters.get("coach_id"), Some(Value::from(coach_id)));
        assert_eq!(filters.get("is_active"), Some(Value::from(true)));
        assert_eq!(filters.get("status"), None);
    }
}
