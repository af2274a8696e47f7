pub mod auth;
pub mod messages;
pub mod users;

use std::sync::Arc;

use anyhow::anyhow;
use axum::http::StatusCode;
use tracing::error;

use roster_core::Error;
use roster_core::auth::AccountService;
use roster_core::messages::MessageService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub accounts: AccountService,
    pub messages: MessageService,
}

/// Service calls block (SQLite, argon2), so every handler runs them on the
/// blocking thread pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::Internal(anyhow!("blocking task join error: {e}")))?
}

/// Translated error kinds map to 4xx; anything internal is a bare 500 with
/// the detail kept in the logs.
pub(crate) fn error_status(err: &Error) -> StatusCode {
    match err {
        Error::UserExists => StatusCode::CONFLICT,
        Error::UserNotFound => StatusCode::NOT_FOUND,
        Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
        Error::Internal(e) => {
            error!("internal error: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
