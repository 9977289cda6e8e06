use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A date range during which a client is actively assigned to a coach
/// under a payment plan. An open `end_date` means the period is ongoing.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::client_activity_periods::Model)]
#[sea_orm(schema_name = "backoffice", table_name = "client_activity_periods")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    #[schema(value_type = uuid::Uuid)]
    pub id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub client_id: Id,
    #[schema(value_type = uuid::Uuid)]
    pub coach_id: Id,
    #[schema(value_type = Option<uuid::Uuid>)]
    pub payment_plan_id: Option<Id>,
    #[schema(value_type = String, format = Date)]
    pub start_date: Date,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<Date>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether this period covers any day of the inclusive range `[start, end]`.
    /// A `None` end on either side extends indefinitely into the future.
    pub fn overlaps(&self, start: Date, end: Option<Date>) -> bool {
        let starts_before_other_ends = match end {
            Some(end) => self.start_date <= end,
            None => true,
        };
        let ends_after_other_starts = match self.end_date {
            Some(own_end) => own_end >= start,
            None => true,
        };
        starts_before_other_ends && ends_after_other_starts
    }

    pub fn is_active_on(&self, day: Date) -> bool {
        self.overlaps(day, Some(day))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Clients,
    #[sea_orm(
        belongs_to = "super::coaches::Entity",
        from = "Column::CoachId",
        to = "super::coaches::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Coaches,
    #[sea_orm(
        belongs_to = "super::payment_plans::Entity",
        from = "Column::PaymentPlanId",
        to = "super::payment_plans::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    PaymentPlans,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::coaches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coaches.def()
    }
}

impl Related<super::payment_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> Date {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(start: Date, end: Option<Date>) -> Model {
        Model {
            id: Id::new_v4(),
            client_id: Id::new_v4(),
            coach_id: Id::new_v4(),
            payment_plan_id: None,
            start_date: start,
            end_date: end,
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        }
    }

    #[test]
    fn closed_periods_overlap_when_ranges_share_a_day() {
        let existing = period(day(2024, 1, 1), Some(day(2024, 1, 31)));

        assert!(existing.overlaps(day(2024, 1, 31), Some(day(2024, 2, 28))));
        assert!(!existing.overlaps(day(2024, 2, 1), Some(day(2024, 2, 28))));
        assert!(!existing.overlaps(day(2023, 12, 1), Some(day(2023, 12, 31))));
    }

    #[test]
    fn open_ended_period_overlaps_everything_after_its_start() {
        let existing = period(day(2024, 3, 1), None);

        assert!(existing.overlaps(day(2030, 1, 1), None));
        assert!(existing.overlaps(day(2024, 1, 1), Some(day(2024, 3, 1))));
        assert!(!existing.overlaps(day(2024, 1, 1), Some(day(2024, 2, 29))));
    }

    #[test]
    fn is_active_on_includes_both_boundaries() {
        let existing = period(day(2024, 5, 1), Some(day(2024, 5, 31)));

        assert!(existing.is_active_on(day(2024, 5, 1)));
        assert!(existing.is_active_on(day(2024, 5, 31)));
        assert!(!existing.is_active_on(day(2024, 6, 1)));
    }
}
