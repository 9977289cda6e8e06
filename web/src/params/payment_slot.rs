use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use domain::payment_slot_status::PaymentSlotStatus;
use domain::Id;

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Uuid)]
    pub(crate) payment_plan_id: Id,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct StatusParams {
    pub(crate) value: PaymentSlotStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct MarkOverdueParams {
    /// Slots due before this day become overdue; defaults to today (UTC)
    pub(crate) today: Option<NaiveDate>,
}
