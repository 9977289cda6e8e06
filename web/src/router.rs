use crate::{
    controller::health_check_controller, middleware::auth::require_auth, params, protect, AppState,
};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};

use crate::controller::{
    activity_period_controller, audit_log_controller, client_controller, coach_controller,
    coach_payment_controller, coach_team_controller, finance_controller, goal_category_controller,
    goal_controller, goal_type_controller, payment_controller, payment_plan_controller,
    payment_slot_controller, user_controller, user_session_controller, win_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Coaching Back Office API"
        ),
        paths(
            activity_period_controller::index,
            activity_period_controller::create,
            activity_period_controller::read,
            activity_period_controller::update,
            activity_period_controller::end,
            activity_period_controller::delete,
            audit_log_controller::index,
            audit_log_controller::read,
            audit_log_controller::table,
            audit_log_controller::facets,
            client_controller::create,
            client_controller::read,
            client_controller::index,
            client_controller::update,
            client_controller::deactivate,
            client_controller::table,
            client_controller::facets,
            coach_controller::create,
            coach_controller::read,
            coach_controller::index,
            coach_controller::update,
            coach_controller::deactivate,
            coach_controller::payment_summary,
            coach_controller::table,
            coach_controller::facets,
            coach_payment_controller::create,
            coach_payment_controller::read,
            coach_payment_controller::index,
            coach_payment_controller::update,
            coach_payment_controller::update_status,
            coach_payment_controller::delete,
            coach_payment_controller::table,
            coach_payment_controller::facets,
            coach_team_controller::index,
            coach_team_controller::create,
            coach_team_controller::read,
            coach_team_controller::members,
            coach_team_controller::update,
            coach_team_controller::deactivate,
            finance_controller::kpis,
            finance_controller::monthly_revenue,
            goal_category_controller::index,
            goal_category_controller::create,
            goal_category_controller::read,
            goal_category_controller::update,
            goal_category_controller::delete,
            goal_controller::create,
            goal_controller::read,
            goal_controller::index,
            goal_controller::update,
            goal_controller::update_status,
            goal_controller::delete,
            goal_controller::table,
            goal_controller::facets,
            goal_type_controller::index,
            goal_type_controller::create,
            goal_type_controller::read,
            goal_type_controller::update,
            goal_type_controller::delete,
            health_check_controller::health_check,
            payment_controller::record,
            payment_controller::read,
            payment_controller::index,
            payment_controller::delete,
            payment_controller::table,
            payment_controller::facets,
            payment_plan_controller::create,
            payment_plan_controller::read,
            payment_plan_controller::index,
            payment_plan_controller::update,
            payment_plan_controller::deactivate,
            payment_plan_controller::table,
            payment_plan_controller::facets,
            payment_slot_controller::index,
            payment_slot_controller::read,
            payment_slot_controller::update_status,
            payment_slot_controller::mark_overdue,
            user_controller::index,
            user_controller::create,
            user_controller::read,
            user_controller::update,
            user_controller::update_access,
            user_session_controller::login,
            user_session_controller::logout,
            win_controller::index,
            win_controller::create,
            win_controller::read,
            win_controller::update,
            win_controller::delete,
        ),
        components(
            schemas(
                domain::audit_logs::Model,
                domain::client_activity_periods::Model,
                domain::clients::Model,
                domain::coach_payments::Model,
                domain::coach_teams::Model,
                domain::coaches::Model,
                domain::goal_categories::Model,
                domain::goal_types::Model,
                domain::goals::Model,
                domain::payment_plans::Model,
                domain::payment_slots::Model,
                domain::payments::Model,
                domain::users::Model,
                domain::wins::Model,
                domain::audit_action::AuditAction,
                domain::client_status::ClientStatus,
                domain::coach_payment_status::CoachPaymentStatus,
                domain::goal_status::GoalStatus,
                domain::payment_frequency::PaymentFrequency,
                domain::payment_method::PaymentMethod,
                domain::payment_slot_status::PaymentSlotStatus,
                domain::roles::Role,
                domain::coach_payment::CoachPaymentSummary,
                domain::coach_team::CoachTeamSummary,
                domain::finance::FinanceKpis,
                domain::finance::MonthlyRevenue,
                domain::payment::RecordedPayment,
                domain::payment_plan::PaymentPlanWithSlots,
                domain::table::ColumnFilter,
                domain::table::Facet,
                domain::table::FacetOption,
                domain::table::FacetQuery,
                domain::table::FilterOperator,
                domain::table::FilterType,
                domain::table::SortDirection,
                domain::table::SortSpec,
                domain::table::TableQuery,
                domain::user::Credentials,
                params::activity_period::UpdateParams,
                params::client::UpdateParams,
                params::coach::UpdateParams,
                params::coach_payment::UpdateParams,
                params::coach_team::UpdateParams,
                params::goal::CategoryUpdateParams,
                params::goal::TypeUpdateParams,
                params::goal::UpdateParams,
                params::payment_plan::UpdateParams,
                params::user::AccessParams,
                params::user::UpdateParams,
                params::win::UpdateParams,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "backoffice", description = "Coaching back office API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines our cookie session based authentication requirement for gaining access to our
// API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "id",
                    "Session id value returned from successful login via Set-Cookie header",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(activity_period_routes(app_state.clone()))
        .merge(audit_log_routes(app_state.clone()))
        .merge(client_routes(app_state.clone()))
        .merge(coach_routes(app_state.clone()))
        .merge(coach_payment_routes(app_state.clone()))
        .merge(coach_team_routes(app_state.clone()))
        .merge(finance_routes(app_state.clone()))
        .merge(goal_routes(app_state.clone()))
        .merge(goal_category_routes(app_state.clone()))
        .merge(goal_type_routes(app_state.clone()))
        .merge(health_routes())
        .merge(payment_routes(app_state.clone()))
        .merge(payment_plan_routes(app_state.clone()))
        .merge(payment_slot_routes(app_state.clone()))
        .merge(user_routes(app_state.clone()))
        .merge(user_session_routes())
        .merge(user_session_protected_routes(app_state.clone()))
        .merge(win_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn activity_period_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/client_activity_periods",
            get(activity_period_controller::index).post(activity_period_controller::create),
        )
        .route(
            "/client_activity_periods/{id}",
            get(activity_period_controller::read)
                .put(activity_period_controller::update)
                .delete(activity_period_controller::delete),
        )
        .route(
            "/client_activity_periods/{id}/end",
            put(activity_period_controller::end),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn audit_log_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/audit_logs", get(audit_log_controller::index))
        .route("/audit_logs/{id}", get(audit_log_controller::read))
        .route("/audit_logs/table", post(audit_log_controller::table))
        .route("/audit_logs/facets", post(audit_log_controller::facets))
        .route_layer(from_fn_with_state(app_state.clone(), protect::admin))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn client_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/clients",
            get(client_controller::index).post(client_controller::create),
        )
        .route(
            "/clients/{id}",
            get(client_controller::read)
                .put(client_controller::update)
                .delete(client_controller::deactivate),
        )
        .route("/clients/table", post(client_controller::table))
        .route("/clients/facets", post(client_controller::facets))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn coach_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/coaches",
            get(coach_controller::index).post(coach_controller::create),
        )
        .route(
            "/coaches/{id}",
            get(coach_controller::read)
                .put(coach_controller::update)
                .delete(coach_controller::deactivate),
        )
        .route("/coaches/table", post(coach_controller::table))
        .route("/coaches/facets", post(coach_controller::facets))
        .merge(
            // Payout totals are finance data
            Router::new()
                .route(
                    "/coaches/{id}/payment_summary",
                    get(coach_controller::payment_summary),
                )
                .route_layer(from_fn_with_state(app_state.clone(), protect::finance)),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn coach_payment_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/coach_payments",
            get(coach_payment_controller::index).post(coach_payment_controller::create),
        )
        .route(
            "/coach_payments/{id}",
            get(coach_payment_controller::read)
                .put(coach_payment_controller::update)
                .delete(coach_payment_controller::delete),
        )
        .route(
            "/coach_payments/{id}/status",
            put(coach_payment_controller::update_status),
        )
        .route("/coach_payments/table", post(coach_payment_controller::table))
        .route(
            "/coach_payments/facets",
            post(coach_payment_controller::facets),
        )
        .route_layer(from_fn_with_state(app_state.clone(), protect::finance))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn coach_team_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/coach_teams",
            get(coach_team_controller::index).post(coach_team_controller::create),
        )
        .route(
            "/coach_teams/{id}",
            get(coach_team_controller::read)
                .put(coach_team_controller::update)
                .delete(coach_team_controller::deactivate),
        )
        .route(
            "/coach_teams/{id}/members",
            get(coach_team_controller::members),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn finance_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/finance/kpis", get(finance_controller::kpis))
        .route(
            "/finance/monthly_revenue",
            get(finance_controller::monthly_revenue),
        )
        .route_layer(from_fn_with_state(app_state.clone(), protect::finance))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn goal_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/goals",
            get(goal_controller::index).post(goal_controller::create),
        )
        .route(
            "/goals/{id}",
            get(goal_controller::read)
                .put(goal_controller::update)
                .delete(goal_controller::delete),
        )
        .route("/goals/{id}/status", put(goal_controller::update_status))
        .route("/goals/table", post(goal_controller::table))
        .route("/goals/facets", post(goal_controller::facets))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn goal_category_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/goal_categories",
            get(goal_category_controller::index).post(goal_category_controller::create),
        )
        .route(
            "/goal_categories/{id}",
            get(goal_category_controller::read)
                .put(goal_category_controller::update)
                .delete(goal_category_controller::delete),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn goal_type_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/goal_types",
            get(goal_type_controller::index).post(goal_type_controller::create),
        )
        .route(
            "/goal_types/{id}",
            get(goal_type_controller::read)
                .put(goal_type_controller::update)
                .delete(goal_type_controller::delete),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn payment_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/payments", get(payment_controller::index))
        .route("/payments/{id}", get(payment_controller::read))
        .route("/payments/table", post(payment_controller::table))
        .route("/payments/facets", post(payment_controller::facets))
        .merge(
            Router::new()
                .route("/payments", post(payment_controller::record))
                .route("/payments/{id}", delete(payment_controller::delete))
                .route_layer(from_fn_with_state(app_state.clone(), protect::finance)),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn payment_plan_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/payment_plans", get(payment_plan_controller::index))
        .route("/payment_plans/{id}", get(payment_plan_controller::read))
        .route("/payment_plans/table", post(payment_plan_controller::table))
        .route(
            "/payment_plans/facets",
            post(payment_plan_controller::facets),
        )
        .merge(
            Router::new()
                .route("/payment_plans", post(payment_plan_controller::create))
                .route(
                    "/payment_plans/{id}",
                    put(payment_plan_controller::update)
                        .delete(payment_plan_controller::deactivate),
                )
                .route_layer(from_fn_with_state(app_state.clone(), protect::finance)),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn payment_slot_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/payment_slots", get(payment_slot_controller::index))
        .route("/payment_slots/{id}", get(payment_slot_controller::read))
        .merge(
            Router::new()
                .route(
                    "/payment_slots/{id}/status",
                    put(payment_slot_controller::update_status),
                )
                .route(
                    "/payment_slots/mark_overdue",
                    post(payment_slot_controller::mark_overdue),
                )
                .route_layer(from_fn_with_state(app_state.clone(), protect::finance)),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            Router::new()
                .route(
                    "/users",
                    get(user_controller::index).post(user_controller::create),
                )
                .route(
                    "/users/{id}/access",
                    put(user_controller::update_access),
                )
                .route_layer(from_fn_with_state(app_state.clone(), protect::admin)),
        )
        .merge(
            Router::new()
                .route(
                    "/users/{id}",
                    get(user_controller::read).put(user_controller::update),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::self_or_admin,
                )),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

pub fn user_session_protected_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/logout", get(user_session_controller::logout))
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

pub fn user_session_routes() -> Router {
    Router::new().route("/login", post(user_session_controller::login))
}

fn win_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/wins", get(win_controller::index).post(win_controller::create))
        .route(
            "/wins/{id}",
            get(win_controller::read)
                .put(win_controller::update)
                .delete(win_controller::delete),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

#[cfg(test)]
mod api_doc_tests {
    use super::*;

    #[test]
    fn activity_period_overlaps_are_documented_as_unprocessable() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let operations = [
            ("/client_activity_periods", "post"),
            ("/client_activity_periods/{id}", "put"),
            ("/client_activity_periods/{id}/end", "put"),
        ];

        for (path, method) in operations {
            let responses = &doc["paths"][path][method]["responses"];
            assert!(responses["422"]["description"]
                .as_str()
                .unwrap()
                .contains("overlaps"));
            assert!(responses.get("409").is_none(), "{method} {path}");
        }
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::middleware::auth::tests::{login, user_with_role};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum_login::{
        tower_sessions::{Expiry, MemoryStore, SessionManagerLayer},
        AuthManagerLayerBuilder,
    };
    use domain::user::Backend;
    use domain::users::{self, Role};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use service::config::Config;
    use std::sync::Arc;
    use time::Duration;
    use tower::ServiceExt;

    fn app(db: DatabaseConnection) -> Router {
        let db = Arc::new(db);
        let app_state = AppState::new(Config::from_env(), &db);

        let session_layer = SessionManagerLayer::new(MemoryStore::default())
            .with_secure(false)
            .with_expiry(Expiry::OnInactivity(Duration::days(1)));
        let auth_layer = AuthManagerLayerBuilder::new(Backend::new(&db), session_layer).build();

        define_routes(app_state).layer(auth_layer)
    }

    // Login loads the user by email, the next request loads it from the session
    fn db_with_logged_in(user: &users::Model) -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user.clone()]])
            .append_query_results([[user.clone()]])
            .into_connection()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn resources_require_a_session() {
        let app = app(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let request = Request::builder()
            .uri("/clients")
            .header("x-version", "1.0.0")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn staff_cannot_read_finance_kpis() {
        let staff = user_with_role(Role::Staff);
        let app = app(db_with_logged_in(&staff));

        let cookie = login(&app, &staff).await;
        let request = Request::builder()
            .uri("/finance/kpis?start=2024-01-01&end=2024-01-31")
            .header("x-version", "1.0.0")
            .header("cookie", cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn staff_cannot_list_users() {
        let staff = user_with_role(Role::Staff);
        let app = app(db_with_logged_in(&staff));

        let cookie = login(&app, &staff).await;
        let request = Request::builder()
            .uri("/users")
            .header("x-version", "1.0.0")
            .header("cookie", cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn missing_version_header_is_a_bad_request() {
        let staff = user_with_role(Role::Staff);
        let app = app(db_with_logged_in(&staff));

        let cookie = login(&app, &staff).await;
        let request = Request::builder()
            .uri("/clients")
            .header("cookie", cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
