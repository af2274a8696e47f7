use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use roster_types::api::{BlockResponse, PageQuery};

use crate::{AppState, error_status, run_blocking};

pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let accounts = state.accounts.clone();
    let users = run_blocking(move || accounts.list_users(page.limit, page.offset))
        .await
        .map_err(|e| error_status(&e))?;

    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let accounts = state.accounts.clone();
    let user = run_blocking(move || accounts.get_user(user_id))
        .await
        .map_err(|e| error_status(&e))?;

    Ok(Json(user))
}

pub async fn block_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, StatusCode> {
    let accounts = state.accounts.clone();
    run_blocking(move || accounts.block_user(user_id))
        .await
        .map_err(|e| error_status(&e))?;

    Ok(Json(BlockResponse {
        user_id,
        blocked: true,
    }))
}
