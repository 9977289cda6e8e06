use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use domain::{Id, IntoUpdateMap, UpdateMap};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Uuid)]
    pub(crate) client_id: Id,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateParams {
    #[schema(value_type = Option<Uuid>)]
    pub goal_id: Option<Id>,
    #[schema(value_type = Option<Uuid>)]
    pub coach_id: Option<Id>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub win_date: Option<NaiveDate>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("goal_id", self.goal_id);
        update_map.insert_some("coach_id", self.coach_id);
        update_map.insert_some("title", self.title);
        update_map.insert_some("description", self.description);
        update_map.insert_some("win_date", self.win_date);
        update_map
    }
}
