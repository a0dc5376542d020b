use axum::Json;
use axum::extract::{Path, State};

use crate::dto::AccountResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/accounts/{username} - Public profile lookup.
pub async fn get_account_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<AccountResponse>> {
    let account = state.account_service.find_by_username(&username).await?;
    Ok(Json(AccountResponse::from(account)))
}
