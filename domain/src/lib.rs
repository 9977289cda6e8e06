//! This module re-exports various items from the `entity_api` crate.
//!
//! The purpose of this re-export is to ensure that consumers of the `domain` crate do not need to
//! directly depend on the `entity_api` crate. By re-exporting these items, we provide a clear and
//! consistent interface for working with query filters, update maps and data tables within the
//! domain layer, while the underlying implementation details remain in the `entity_api` crate.
pub use entity_api::{
    mutate::{IntoUpdateMap, UpdateMap},
    query::{IntoQueryFilterMap, QueryFilterMap, QuerySort},
};

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{
    audit_logs, billing_charges, billing_subscriptions, client_activity_periods, clients,
    coach_payments, coach_teams, coaches, goal_categories, goal_types, goals, payment_plans,
    payment_slots, payments, users, wins, Id,
};
pub use entity::{
    audit_action, client_status, coach_payment_status, goal_status, payment_frequency,
    payment_method, payment_slot_status, roles,
};

pub use events::{DomainEvent, EventPublisher};

pub mod audit_log;
pub mod client;
pub mod client_activity_period;
pub mod coach;
pub mod coach_payment;
pub mod coach_team;
pub mod error;
pub mod finance;
pub mod goal;
pub mod goal_category;
pub mod goal_type;
pub mod payment;
pub mod payment_plan;
pub mod payment_slot;
pub mod table;
pub mod user;
pub mod win;
