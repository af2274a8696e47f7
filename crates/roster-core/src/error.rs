use thiserror::Error;

/// Error taxonomy shared by the services and the store adapter.
///
/// Storage-engine errors are translated into these kinds at the adapter
/// boundary; the services only ever match on the translated variants and
/// never inspect engine-specific codes.
#[derive(Debug, Error)]
pub enum Error {
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    /// Any underlying store or infrastructure failure. Rendered as a bare
    /// 500 at the HTTP boundary; the wrapped detail stays in the logs.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
