use serde::Deserialize;
use utoipa::IntoParams;

use domain::Id;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    /// Table the audited records belong to, e.g. `payments`
    pub(crate) table_name: String,
    #[param(value_type = Option<Uuid>)]
    pub(crate) record_id: Option<Id>,
}
