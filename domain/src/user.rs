use crate::error::Error;
use crate::users::Model;
use crate::{Id, IntoUpdateMap};
use entity_api::user;
use events::{DomainEvent, EventPublisher};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub use entity_api::user::{
    find_all, find_by_email, find_by_id, AuthSession, Backend, Credentials, Role,
};

const TABLE: &str = "users";

pub async fn create(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    user_model: Model,
) -> Result<Model, Error> {
    user_model.validate()?;

    let user = user::create(db, user_model).await?;
    // The serialized record never carries the password hash
    publisher
        .publish(DomainEvent::created(TABLE, user.id, Some(actor_id), &user))
        .await;

    Ok(user)
}

pub async fn update(
    db: &DatabaseConnection,
    publisher: &EventPublisher,
    actor_id: Id,
    user_id: Id,
    params: impl IntoUpdateMap,
) -> Result<Model, Error> {
    let user = user::update(db, user_id, params.into_update_map()).await?;
    publisher
        .publish(DomainEvent::updated(TABLE, user.id, Some(actor_id), &user))
        .await;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_users_omit_the_password() {
        let now = chrono::Utc::now();
        let user = Model {
            id: Id::new_v4(),
            email: "staff@example.com".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Taff".to_string(),
            display_name: None,
            password: "hash".to_string(),
            role: Role::Staff,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let event = DomainEvent::created(TABLE, user.id, None, &user);

        match event {
            DomainEvent::RecordCreated { record, .. } => {
                assert!(record.get("password").is_none());
                assert_eq!(record["email"], "staff@example.com");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
