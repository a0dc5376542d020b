use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use skillswap_application::{LoginOutcome, seconds_until};
use skillswap_core::AppError;
use tracing::{info, warn};

use crate::dto::{AccountResponse, LoginRequest, LoginResponse, RegisterRequest};
use crate::error::ApiResult;
use crate::middleware::{client_identifier, retry_after_response};
use crate::state::AppState;

const LOCKED_MESSAGE: &str = "too many failed login attempts, try again later";

/// POST /auth/register - Create a new account with username+password.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let account = state
        .account_service
        .register(&payload.username, &payload.password)
        .await?;

    info!(username = account.username.as_str(), "account registered");
    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// POST /auth/login - Authenticate with username+password behind the
/// failed-attempt gate.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Response> {
    let client = client_identifier(&headers);

    let outcome = state
        .account_service
        .login(&client, &payload.username, &payload.password)
        .await?;

    match outcome {
        LoginOutcome::Authenticated(account) => Ok(Json(LoginResponse {
            status: "authenticated",
            account: AccountResponse::from(account),
        })
        .into_response()),
        // Generic response to prevent account enumeration.
        LoginOutcome::Failed { .. } => {
            Err(AppError::Unauthorized("invalid username or password".to_owned()).into())
        }
        LoginOutcome::Locked { locked_until } => {
            let now = state.clock.now();
            warn!(client = %client, "login locked after repeated failures");
            let retry_after = locked_until.map_or(0, |until| seconds_until(until, now));
            Ok(retry_after_response(LOCKED_MESSAGE, retry_after))
        }
    }
}
