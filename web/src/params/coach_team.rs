use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use domain::{Id, IntoUpdateMap, UpdateMap};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    /// Also list deactivated teams
    #[serde(default)]
    pub(crate) include_inactive: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateParams {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<Uuid>)]
    pub team_leader_id: Option<Id>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        update_map.insert_some("name", self.name);
        update_map.insert_some("description", self.description);
        update_map.insert_some("team_leader_id", self.team_leader_id);
        update_map
    }
}
