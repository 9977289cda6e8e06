//! Read access to the subscription billing mirror. Nothing here writes to it.

use super::error::Error;
use entity::{billing_charges, billing_subscriptions};
use sea_orm::{entity::prelude::*, Condition, ConnectionTrait};

/// Subscriptions that could have been live at any point in `[from, until)`:
/// created before `until` and not canceled before `from`.
pub async fn find_subscriptions_live_between(
    db: &impl ConnectionTrait,
    from: DateTimeWithTimeZone,
    until: DateTimeWithTimeZone,
) -> Result<Vec<billing_subscriptions::Model>, Error> {
    Ok(billing_subscriptions::Entity::find()
        .filter(billing_subscriptions::Column::CreatedAt.lt(until))
        .filter(
            Condition::any()
                .add(billing_subscriptions::Column::CanceledAt.is_null())
                .add(billing_subscriptions::Column::CanceledAt.gte(from)),
        )
        .all(db)
        .await?)
}

pub async fn find_revenue_subscriptions(
    db: &impl ConnectionTrait,
) -> Result<Vec<billing_subscriptions::Model>, Error> {
    Ok(billing_subscriptions::Entity::find()
        .filter(billing_subscriptions::Column::Status.is_in(["active", "past_due"]))
        .all(db)
        .await?)
}

/// Succeeded charges created within `[from, until)`.
pub async fn find_succeeded_charges(
    db: &impl ConnectionTrait,
    from: DateTimeWithTimeZone,
    until: DateTimeWithTimeZone,
) -> Result<Vec<billing_charges::Model>, Error> {
    Ok(billing_charges::Entity::find()
        .filter(billing_charges::Column::Status.eq("succeeded"))
        .filter(billing_charges::Column::CreatedAt.gte(from))
        .filter(billing_charges::Column::CreatedAt.lt(until))
        .all(db)
        .await?)
}
