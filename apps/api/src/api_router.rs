use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod public_auth;

#[cfg(test)]
mod tests;

pub fn build_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/accounts/{username}",
            get(handlers::accounts::get_account_handler),
        )
        .route_layer(from_fn_with_state(app_state.clone(), middleware::rate_limit))
        .layer(axum::Extension(app_state.rate_limit_rules.api.clone()));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(public_auth::build_register_routes(app_state.clone()))
        .merge(public_auth::build_login_routes(app_state.clone()))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
