use crate::error::Error;
use crate::payment_slots::Model;
use crate::Id;
use chrono::NaiveDate;
use entity::payment_slot_status::PaymentSlotStatus;
use entity_api::payment_slot;
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;

pub use entity_api::payment_slot::{find_by_id, find_by_plan};

const TABLE: &str = "payment_slots";

pub async fn update_status(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    id: Id,
    status: PaymentSlotStatus,
) -> Result<Model, Error> {
    let slot = payment_slot::update_status(db, id, status).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, slot.id, Some(actor_id), &slot))
        .await;

    Ok(slot)
}

/// Flags every pending slot due before `today` as overdue and returns how many changed.
pub async fn mark_overdue(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    today: NaiveDate,
) -> Result<u64, Error> {
    let slots = payment_slot::mark_overdue(db, today).await?;
    for slot in &slots {
        publisher
            .publish(DomainEvent::updated(TABLE, slot.id, Some(actor_id), slot))
            .await;
    }

    Ok(slots.len() as u64)
}
