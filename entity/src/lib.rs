use uuid::Uuid;

// Back-office entities
pub mod audit_logs;
pub mod client_activity_periods;
pub mod clients;
pub mod coach_payments;
pub mod coach_teams;
pub mod coaches;
pub mod goal_categories;
pub mod goal_types;
pub mod goals;
pub mod payment_plans;
pub mod payment_slots;
pub mod payments;
pub mod users;
pub mod wins;

// Enumerations stored as PostgreSQL enum types
pub mod audit_action;
pub mod client_status;
pub mod coach_payment_status;
pub mod goal_status;
pub mod payment_frequency;
pub mod payment_method;
pub mod payment_slot_status;
pub mod roles;

// Read-only mirror of the subscription billing provider
pub mod billing_charges;
pub mod billing_subscriptions;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
