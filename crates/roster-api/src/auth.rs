use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::warn;

use roster_core::Error;
use roster_types::api::{LoginRequest, RegisterRequest, RegisterResponse};

use crate::{AppState, error_status, run_blocking};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    // Format validation lives here, not in the service.
    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "rejected malformed email");
        return Err(StatusCode::BAD_REQUEST);
    }

    let accounts = state.accounts.clone();
    let user_id = run_blocking(move || accounts.register_new_user(&req.email, &req.password))
        .await
        .map_err(|e| error_status(&e))?;

    Ok(Json(RegisterResponse { user_id }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<StatusCode, StatusCode> {
    let accounts = state.accounts.clone();
    let result = run_blocking(move || accounts.login(&req.email, &req.password)).await;

    // Unknown email and wrong password collapse to the same response so the
    // HTTP surface does not enumerate accounts.
    match result {
        Ok(()) => Ok(StatusCode::OK),
        Err(Error::UserNotFound | Error::InvalidCredentials) => Err(StatusCode::UNAUTHORIZED),
        Err(e) => Err(error_status(&e)),
    }
}

/// Structural check only: one `@`, a non-empty local part, a dot somewhere
/// in the domain. Deliverability is not our problem.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::is_valid_email;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.co"));
    }

    #[test]
    fn rejects_structural_garbage() {
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("ann@nodot"));
        assert!(!is_valid_email("ann@.com"));
        assert!(!is_valid_email("ann@example.com."));
        assert!(!is_valid_email("ann @example.com"));
    }
}
