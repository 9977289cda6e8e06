use chrono::NaiveDate;
use sea_orm::Order;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::sort::SortOrder;
use super::WithSortDefaults;
use domain::coach_payment_status::CoachPaymentStatus;
use domain::{
    coach_payments, Id, IntoQueryFilterMap, IntoUpdateMap, QueryFilterMap, QuerySort, UpdateMap,
};

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = "period_end")]
pub(crate) enum SortField {
    #[serde(rename = "period_start")]
    PeriodStart,
    #[serde(rename = "period_end")]
    PeriodEnd,
    #[serde(rename = "amount_cents")]
    AmountCents,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) coach_id: Option<Id>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) client_id: Option<Id>,
    pub(crate) status: Option<CoachPaymentStatus>,
    pub(crate) sort_by: Option<SortField>,
    pub(crate) sort_order: Option<SortOrder>,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert_some("coach_id", self.coach_id);
        query_filter_map.insert_some("client_id", self.client_id);
        query_filter_map.insert_some("status", self.status);
        query_filter_map
    }
}

impl QuerySort<coach_payments::Column> for IndexParams {
    fn get_sort_column(&self) -> Option<coach_payments::Column> {
        self.sort_by.as_ref().map(|field| match field {
            SortField::PeriodStart => coach_payments::Column::PeriodStart,
            SortField::PeriodEnd => coach_payments::Column::PeriodEnd,
            SortField::AmountCents => coach_payments::Column::AmountCents,
        })
    }

    fn get_sort_order(&self) -> Option<Order> {
        self.sort_order.as_ref().map(Order::from)
    }
}

impl WithSortDefaults for IndexParams {
    type SortField = SortField;
}

/// Status changes go through the status endpoint so `paid_at` stays consistent.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateParams {
    #[schema(value_type = Option<Uuid>)]
    pub client_id: Option<Id>,
    #[validate(range(min = 1, message = "must be a positive amount of cents"))]
    pub amount_cents: Option<i64>,
    #[validate(length(equal = 3, message = "must be an ISO 4217 currency code"))]
    pub currency: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub period_start: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub period_end: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("client_id", self.client_id);
        update_map.insert_some("amount_cents", self.amount_cents);
        update_map.insert_some("currency", self.currency.map(|c| c.to_uppercase()));
        update_map.insert_some("period_start", self.period_start);
        update_map.insert_some("period_end", self.period_end);
        update_map.insert_some("notes", self.notes);
        update_map
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct StatusParams {
    pub(crate) value: CoachPaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Value;

    #[test]
    fn period_dates_are_carried_as_dates() {
        let period_end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let params = UpdateParams {
            period_end: Some(period_end),
            currency: Some("eur".to_string()),
            ..Default::default()
        };

        let update_map = params.into_update_map();

        assert_eq!(
            update_map.get("period_end"),
            Some(&Value::ChronoDate(Some(Box::new(period_end))))
        );
        assert_eq!(
            update_map.get("currency"),
            Some(&Value::String(Some(Box::new("EUR".to_string()))))
        );
    }

    #[test]
    fn non_positive_amounts_fail_validation() {
        let params = UpdateParams {
            amount_cents: Some(0),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
