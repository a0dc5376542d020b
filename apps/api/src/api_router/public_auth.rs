use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::post;

use crate::state::AppState;
use crate::{handlers, middleware};

pub(super) fn build_login_routes(app_state: AppState) -> Router<AppState> {
    let login_rate_rule = app_state.rate_limit_rules.login.clone();

    Router::new()
        .route("/auth/login", post(handlers::auth::login_handler))
        .route_layer(from_fn_with_state(app_state, middleware::rate_limit))
        .layer(axum::Extension(login_rate_rule))
}

pub(super) fn build_register_routes(app_state: AppState) -> Router<AppState> {
    let register_rate_rule = app_state.rate_limit_rules.registration.clone();

    Router::new()
        .route("/auth/register", post(handlers::auth::register_handler))
        .route_layer(from_fn_with_state(app_state, middleware::rate_limit))
        .layer(axum::Extension(register_rate_rule))
}
