//! Typed parameters for endpoint inputs.
//!
//! Query strings deserialize into `IndexParams` structs that turn into a
//! `QueryFilterMap` (and optionally a sort) for `find_by`, and partial update
//! bodies deserialize into `UpdateParams` structs that turn into an `UpdateMap`
//! carrying correctly typed column values. Fields left out of a request never
//! reach the map.

pub(crate) mod activity_period;
pub(crate) mod audit_log;
pub(crate) mod client;
pub(crate) mod coach;
pub(crate) mod coach_payment;
pub(crate) mod coach_team;
pub(crate) mod finance;
pub(crate) mod goal;
pub(crate) mod payment;
pub(crate) mod payment_plan;
pub(crate) mod payment_slot;
pub(crate) mod sort;
pub(crate) mod user;
pub(crate) mod win;

use sort::SortOrder;

/// Index params that sort by a field fall back to `default_field` ascending when
/// the request names neither a field nor an order.
pub(crate) trait WithSortDefaults {
    type SortField;

    fn apply_sort_defaults(
        sort_by: &mut Option<Self::SortField>,
        sort_order: &mut Option<SortOrder>,
        default_field: Self::SortField,
    ) {
        match (sort_by.is_some(), sort_order.is_some()) {
            (false, false) => {
                *sort_by = Some(default_field);
                *sort_order = Some(SortOrder::Asc);
            }
            (true, false) => *sort_order = Some(SortOrder::Asc),
            (false, true) => *sort_by = Some(default_field),
            (true, true) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Params;

    #[derive(Debug, PartialEq)]
    enum Field {
        Name,
        CreatedAt,
    }

    impl WithSortDefaults for Params {
        type SortField = Field;
    }

    #[test]
    fn missing_sort_falls_back_to_default_field_ascending() {
        let (mut sort_by, mut sort_order) = (None, None);
        Params::apply_sort_defaults(&mut sort_by, &mut sort_order, Field::Name);
        assert_eq!(sort_by, Some(Field::Name));
        assert!(matches!(sort_order, Some(SortOrder::Asc)));
    }

    #[test]
    fn explicit_sort_is_kept() {
        let (mut sort_by, mut sort_order) = (Some(Field::CreatedAt), Some(SortOrder::Desc));
        Params::apply_sort_defaults(&mut sort_by, &mut sort_order, Field::Name);
        assert_eq!(sort_by, Some(Field::CreatedAt));
        assert!(matches!(sort_order, Some(SortOrder::Desc)));
    }
}
