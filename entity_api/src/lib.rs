use chrono::{Months, NaiveDate, Utc};
use log::*;
use password_auth::generate_hash;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

pub use entity::{
    audit_logs, billing_charges, billing_subscriptions, client_activity_periods, clients,
    coach_payments, coach_teams, coaches, goal_categories, goal_types, goals, payment_plans,
    payment_slots, payments, users, wins, Id,
};
pub use mutate::{IntoUpdateMap, UpdateMap};
pub use query::{IntoQueryFilterMap, QueryFilterMap, QuerySort};

pub mod audit_log;
pub mod billing;
pub mod client;
pub mod client_activity_period;
pub mod coach;
pub mod coach_payment;
pub mod coach_team;
pub mod error;
pub mod goal;
pub mod goal_category;
pub mod goal_type;
pub mod mutate;
pub mod payment;
pub mod payment_plan;
pub mod payment_slot;
pub mod query;
pub mod table;
pub mod user;
pub mod win;

/// Populates an empty development database with a small, coherent data set.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), error::Error> {
    let now = Utc::now();

    // The initial admin migration may already have created this account
    let admin = match users::Entity::find()
        .filter(users::Column::Email.eq("admin@backoffice.local"))
        .one(db)
        .await?
    {
        Some(admin) => admin,
        None => {
            users::ActiveModel {
                email: Set("admin@backoffice.local".to_owned()),
                first_name: Set("Admin".to_owned()),
                last_name: Set("User".to_owned()),
                display_name: Set(Some("Admin User".to_owned())),
                password: Set(generate_hash("dLxNxnjn&b!2sqkwFbb4s8jX")),
                role: Set(users::Role::Admin),
                is_active: Set(true),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(db)
            .await?
        }
    };

    users::ActiveModel {
        email: Set("finance@backoffice.local".to_owned()),
        first_name: Set("Fran".to_owned()),
        last_name: Set("Nance".to_owned()),
        display_name: Set(None),
        password: Set(generate_hash("password")),
        role: Set(users::Role::Finance),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let coach_user = users::ActiveModel {
        email: Set("jordan.coach@backoffice.local".to_owned()),
        first_name: Set("Jordan".to_owned()),
        last_name: Set("Reyes".to_owned()),
        display_name: Set(Some("Coach Jordan".to_owned())),
        password: Set(generate_hash("password")),
        role: Set(users::Role::Staff),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let north_team = coach_teams::ActiveModel {
        name: Set("North".to_owned()),
        description: Set(Some("Performance coaching".to_owned())),
        team_leader_id: Set(None),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let jordan = coaches::ActiveModel {
        user_id: Set(Some(coach_user.id)),
        coach_team_id: Set(Some(north_team.id)),
        first_name: Set("Jordan".to_owned()),
        last_name: Set("Reyes".to_owned()),
        email: Set("jordan.coach@backoffice.local".to_owned()),
        phone: Set(None),
        specialties: Set(vec!["nutrition".to_owned(), "strength".to_owned()]),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let north_team_id = north_team.id;
    let mut team = coach_teams::ActiveModel::from(north_team);
    team.team_leader_id = Set(Some(jordan.id));
    team.update(db).await?;

    let sam = coaches::ActiveModel {
        user_id: Set(None),
        coach_team_id: Set(Some(north_team_id)),
        first_name: Set("Sam".to_owned()),
        last_name: Set("Okafor".to_owned()),
        email: Set("sam.coach@backoffice.local".to_owned()),
        phone: Set(Some("+1 555 0100".to_owned())),
        specialties: Set(vec!["mindset".to_owned()]),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let ada = clients::ActiveModel {
        first_name: Set("Ada".to_owned()),
        last_name: Set("Lovelace".to_owned()),
        email: Set("ada@example.com".to_owned()),
        phone: Set(None),
        status: Set(entity::client_status::ClientStatus::Active),
        coach_id: Set(Some(jordan.id)),
        tags: Set(vec!["vip".to_owned(), "referral".to_owned()]),
        notes: Set(None),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    clients::ActiveModel {
        first_name: Set("Grace".to_owned()),
        last_name: Set("Hopper".to_owned()),
        email: Set("grace@example.com".to_owned()),
        phone: Set(None),
        status: Set(entity::client_status::ClientStatus::Lead),
        coach_id: Set(Some(sam.id)),
        tags: Set(vec!["webinar".to_owned()]),
        notes: Set(Some("Asked about the group program".to_owned())),
        is_active: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let start_date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap_or_default();
    let schedule = (0..3u32)
        .map(|i| payment_slot::ScheduledSlot {
            sequence: i as i32 + 1,
            due_date: start_date
                .checked_add_months(Months::new(i))
                .unwrap_or(start_date),
            amount_due_cents: if i == 0 { 10_001 } else { 10_000 },
        })
        .collect();
    let plan = payment_plan::create(
        db,
        payment_plans::Model {
            id: Id::nil(),
            client_id: ada.id,
            name: "Quarterly coaching".to_owned(),
            total_amount_cents: 30_001,
            currency: "USD".to_owned(),
            installment_count: 3,
            frequency: entity::payment_frequency::PaymentFrequency::Monthly,
            start_date,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        },
        schedule,
    )
    .await?;

    client_activity_periods::ActiveModel {
        client_id: Set(ada.id),
        coach_id: Set(jordan.id),
        payment_plan_id: Set(Some(plan.plan.id)),
        start_date: Set(start_date),
        end_date: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let fitness = goal_categories::ActiveModel {
        name: Set("Fitness".to_owned()),
        description: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    goal_types::ActiveModel {
        goal_category_id: Set(fitness.id),
        name: Set("Weekly workouts".to_owned()),
        unit: Set(Some("sessions".to_owned())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Seeded development data, admin user id {}", admin.id);
    Ok(())
}
