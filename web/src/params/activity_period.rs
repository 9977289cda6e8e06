use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use domain::{Id, IntoUpdateMap, UpdateMap};

/// Exactly one selector is used, checked in the order `client_id`, `coach_id`,
/// `active_on`.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Option<Uuid>)]
    pub(crate) client_id: Option<Id>,
    #[param(value_type = Option<Uuid>)]
    pub(crate) coach_id: Option<Id>,
    pub(crate) active_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateParams {
    #[schema(value_type = Option<Uuid>)]
    pub coach_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub payment_plan_id: Option<Id>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("coach_id", self.coach_id);
        update_map.insert_some("payment_plan_id", self.payment_plan_id);
        update_map.insert_some("start_date", self.start_date);
        update_map.insert_some("end_date", self.end_date);
        update_map
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct EndParams {
    pub(crate) end_date: NaiveDate,
}
