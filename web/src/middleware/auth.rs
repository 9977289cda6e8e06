use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_login::AuthSession;

/// Rejects requests without a logged in user with 401 Unauthorized.
///
/// API clients get a status code instead of the redirect to a login page that
/// axum-login's `login_required!` would produce.
pub async fn require_auth(
    auth_session: AuthSession<domain::user::Backend>,
    request: Request,
    next: Next,
) -> Response {
    match auth_session.user {
        Some(_user) => next.run(request).await,
        None => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
    }
}

#[cfg(test)]
#[cfg(feature = "mock")]
pub(crate) mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware::from_fn, routing::get, Router};
    use axum_login::{
        tower_sessions::{Expiry, MemoryStore, SessionManagerLayer},
        AuthManagerLayerBuilder,
    };
    use chrono::Utc;
    use domain::user::Backend;
    use domain::{users, Id};
    use password_auth::generate_hash;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use service::config::Config;
    use std::sync::Arc;
    use time::Duration;
    use tower::ServiceExt;

    pub(crate) const PASSWORD: &str = "correct-horse-battery";

    pub(crate) fn user_with_role(role: users::Role) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Id::new_v4(),
            email: format!("{role}@backoffice.test"),
            first_name: "Test".to_string(),
            last_name: role.to_string(),
            display_name: None,
            password: generate_hash(PASSWORD),
            role,
            is_active: true,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    /// Wraps `router` in the session and auth layers the server uses, backed by `db`.
    pub(crate) fn with_auth_layers(
        router: Router<crate::AppState>,
        db: DatabaseConnection,
    ) -> Router {
        let db = Arc::new(db);
        let app_state = crate::AppState::new(Config::from_env(), &db);

        let session_layer = SessionManagerLayer::new(MemoryStore::default())
            .with_secure(false)
            .with_expiry(Expiry::OnInactivity(Duration::days(1)));
        let auth_layer = AuthManagerLayerBuilder::new(Backend::new(&db), session_layer).build();

        router
            .route(
                "/login",
                axum::routing::post(crate::controller::user_session_controller::login),
            )
            .layer(auth_layer)
            .with_state(app_state)
    }

    /// Logs `user` in and returns the session cookie.
    pub(crate) async fn login(app: &Router, user: &users::Model) -> String {
        let request = Request::builder()
            .uri("/login")
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(format!("email={}&password={PASSWORD}", user.email)))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        response
            .headers()
            .get("set-cookie")
            .and_then(|c| c.to_str().ok())
            .and_then(|c| c.split(';').next())
            .expect("login returns a session cookie")
            .to_string()
    }

    async fn test_handler() -> &'static str {
        "authenticated"
    }

    fn protected_router() -> Router<crate::AppState> {
        Router::new().merge(
            Router::new()
                .route("/test", get(test_handler))
                .route_layer(from_fn(require_auth)),
        )
    }

    #[tokio::test]
    async fn require_auth_returns_401_without_a_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = with_auth_layers(protected_router(), db);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_auth_returns_401_for_an_unknown_session_cookie() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = with_auth_layers(protected_router(), db);

        let request = Request::builder()
            .uri("/test")
            .header("cookie", "id=not-a-session")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn require_auth_lets_a_logged_in_user_through() {
        let user = user_with_role(users::Role::Staff);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // find_by_email during login
            .append_query_results([[user.clone()]])
            // get_user when the session is loaded again
            .append_query_results([[user.clone()]])
            .into_connection();
        let app = with_auth_layers(protected_router(), db);

        let cookie = login(&app, &user).await;
        let request = Request::builder()
            .uri("/test")
            .header("cookie", cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
