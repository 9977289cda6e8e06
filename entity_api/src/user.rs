use super::error::{EntityApiErrorKind, Error};
use crate::mutate::{self, UpdateMap};
use async_trait::async_trait;
use axum_login::{AuthnBackend, UserId};
use chrono::Utc;

use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use password_auth;
use sea_orm::{
    entity::prelude::*, ConnectionTrait, DatabaseConnection, IntoActiveModel, QueryOrder, Set,
    Value,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

pub use entity::users::Role;

pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {}", user_model.email);

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        email: Set(user_model.email.to_lowercase()),
        first_name: Set(user_model.first_name),
        last_name: Set(user_model.last_name),
        display_name: Set(user_model.display_name),
        password: Set(generate_hash(user_model.password)),
        role: Set(user_model.role),
        is_active: Set(user_model.is_active),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email.to_lowercase()))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_all(db: &impl ConnectionTrait) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_asc(Column::LastName)
        .order_by_asc(Column::FirstName)
        .all(db)
        .await?)
}

/// Applies `update_map` to the user. A `password` entry is hashed before it is stored.
pub async fn update(
    db: &impl ConnectionTrait,
    id: Id,
    mut update_map: UpdateMap,
) -> Result<Model, Error> {
    let user = find_by_id(db, id).await?;

    if let Some(Value::String(Some(password))) = update_map.remove("password") {
        update_map.insert(
            "password".to_string(),
            Some(Value::from(generate_hash(*password))),
        );
    }
    if let Some(Value::String(Some(email))) = update_map.remove("email") {
        update_map.insert("email".to_string(), Some(Value::from(email.to_lowercase())));
    }
    let now: DateTimeWithTimeZone = Utc::now().into();
    update_map.insert("updated_at".to_string(), Some(Value::from(now)));

    mutate::update::<ActiveModel, Column>(db, user.into_active_model(), update_map).await
}

pub async fn verify_password(password_to_verify: &str, password_hash: &str) -> Result<(), Error> {
    match password_auth::verify_password(password_to_verify, password_hash) {
        Ok(_) => Ok(()),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

pub fn generate_hash(password: String) -> String {
    password_auth::generate_hash(password)
}

async fn authenticate_user(creds: Credentials, user: Model) -> Result<Option<Model>, Error> {
    if !user.is_active {
        warn!("Login attempt for deactivated user {}", user.id);
        return Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        });
    }

    match password_auth::verify_password(creds.password, &user.password) {
        Ok(_) => Ok(Some(user)),
        Err(_) => Err(Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordUnauthenticated,
        }),
    }
}

#[derive(Debug, Clone)]
pub struct Backend {
    db: Arc<DatabaseConnection>,
}

#[derive(Debug, Clone, ToSchema, IntoParams, Deserialize)]
#[schema(as = domain::user::Credentials)] // OpenAPI schema
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

impl Backend {
    pub fn new(db: &Arc<DatabaseConnection>) -> Self {
        Self {
            // Arc is cloned, but the source DatabaseConnection refers to the same instance
            // as the one passed in to new() (see the Arc documentation for more info)
            db: Arc::clone(db),
        }
    }
}

#[async_trait]
impl AuthnBackend for Backend {
    type User = Model;
    type Credentials = Credentials;
    type Error = Error;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        match find_by_email(self.db.as_ref(), &creds.email).await? {
            Some(user) => authenticate_user(creds, user).await,
            None => Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordUnauthenticated,
            }),
        }
    }

    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        // Deactivated users lose their existing sessions as well
        Ok(Entity::find_by_id(*user_id)
            .one(self.db.as_ref())
            .await?
            .filter(|user| user.is_active))
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;


#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod mock_tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn find_by_email_lowercases_the_lookup() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let found = find_by_email(&db, "Admin@Example.com").await?;

        assert!(found.is_none());
        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"WHERE \"users\".\"email\" = $1"#));
        assert!(log.contains("admin@example.com"));

        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_returns_not_found_for_missing_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<Model>::new()])
            .into_connection();

        let result = find_by_id(&db, Id::new_v4()).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn create_hashes_the_password() -> Result<(), Error> {
        let now = Utc::now();
        let model = Model {
            id: Id::new_v4(),
            email: "Staff@Example.com".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Taff".to_string(),
            display_name: None,
            password: "plain-text-password".to_string(),
            role: Role::Staff,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[model.clone()]])
            .into_connection();

        create(&db, model).await?;

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("staff@example.com"));
        assert!(!log.contains("plain-text-password"));

        Ok(())
    }
}
