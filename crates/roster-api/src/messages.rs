use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use roster_types::api::PageQuery;

use crate::{AppState, error_status, run_blocking};

pub async fn get_user_messages(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let messages = state.messages.clone();
    let history = run_blocking(move || messages.user_messages(user_id, page.limit, page.offset))
        .await
        .map_err(|e| error_status(&e))?;

    Ok(Json(history))
}
