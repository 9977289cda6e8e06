//! Role based authorization for route groups.
//!
//! Each route group that needs more than an authenticated session wraps itself in
//! one of the middleware functions below through `from_fn_with_state`. A rule that
//! fails aborts the request with **403 FORBIDDEN** before the handler runs.

use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use async_trait::async_trait;
use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use domain::{users, Id};
use log::*;

/// A single authorization rule: is the authenticated user allowed to proceed?
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(&self, app: &AppState, user: &users::Model, args: Vec<Id>) -> bool;
}

/// Pairs a [`Check`] with the arguments it is evaluated against.
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(&self, app_state: &AppState, user: &users::Model) -> bool {
        self.predicate
            .eval(app_state, user, self.args.clone())
            .await
    }
}

/// Runs `next` only when at least one of `checks` passes.
pub(crate) async fn authorize_any(
    app_state: &AppState,
    authenticated_user: users::Model,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> impl IntoResponse {
    for check in &checks {
        if check.check(app_state, &authenticated_user).await {
            return next.run(request).await;
        }
    }
    warn!(
        "User {} ({}) denied {} {}",
        authenticated_user.id,
        authenticated_user.role,
        request.method(),
        request.uri().path()
    );
    (StatusCode::FORBIDDEN, "FORBIDDEN").into_response()
}

pub struct UserIsAdmin;

#[async_trait]
impl Check for UserIsAdmin {
    async fn eval(&self, _app_state: &AppState, user: &users::Model, _args: Vec<Id>) -> bool {
        user.role == users::Role::Admin
    }
}

pub struct UserCanManageFinances;

#[async_trait]
impl Check for UserCanManageFinances {
    async fn eval(&self, _app_state: &AppState, user: &users::Model, _args: Vec<Id>) -> bool {
        user.role.can_manage_finances()
    }
}

pub struct UserIsSelf;

#[async_trait]
impl Check for UserIsSelf {
    async fn eval(&self, _app_state: &AppState, user: &users::Model, args: Vec<Id>) -> bool {
        args.first().is_some_and(|user_id| *user_id == user.id)
    }
}

/// User management and the audit log
pub(crate) async fn admin(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserIsAdmin, vec![])];
    authorize_any(&app_state, user, request, next, checks).await
}

/// Finance dashboards and every mutation of money records
pub(crate) async fn finance(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![Predicate::new(UserCanManageFinances, vec![])];
    authorize_any(&app_state, user, request, next, checks).await
}

/// A user's own record, or any record for admins
pub(crate) async fn self_or_admin(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Id>,
    request: Request,
    next: Next,
) -> impl IntoResponse {
    let checks = vec![
        Predicate::new(UserIsSelf, vec![user_id]),
        Predicate::new(UserIsAdmin, vec![]),
    ];
    authorize_any(&app_state, user, request, next, checks).await
}
