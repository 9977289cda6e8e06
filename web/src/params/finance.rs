use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

/// Inclusive range of calendar days.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct RangeParams {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
}
