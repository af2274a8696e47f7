use roster_types::models::{Message, User};

use crate::Error;

/// Write half of the account store contract.
///
/// The services depend on these two narrow capability traits rather than a
/// concrete database so the business rules stay testable against an
/// in-memory fake.
pub trait UserSaver: Send + Sync {
    /// Persists a new account and returns its assigned id.
    /// Fails with [`Error::UserExists`] on an email uniqueness violation.
    fn save_user(&self, email: &str, password_hash: &[u8]) -> Result<i64, Error>;

    /// Flips the account's active flag to false. Fails with
    /// [`Error::UserNotFound`] when no row was affected; implementations
    /// must detect this from the affected-row count, not a pre-read.
    fn block_user_by_id(&self, user_id: i64) -> Result<(), Error>;
}

/// Read half of the account store contract.
pub trait UserProvider: Send + Sync {
    /// Looks up an account by email with enough of the record to verify a
    /// password. Fails with [`Error::UserNotFound`] on a missing row.
    fn provide_user(&self, email: &str) -> Result<User, Error>;

    fn get_user_by_id(&self, user_id: i64) -> Result<User, Error>;

    /// Accounts ordered by creation time descending, offset-paginated.
    fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, Error>;
}

/// Read access to a user's message history.
pub trait MessageProvider: Send + Sync {
    /// Messages ordered by creation time descending, offset-paginated.
    /// An unknown user yields an empty vec, not an error.
    fn user_messages(&self, user_id: i64, limit: u32, offset: u32) -> Result<Vec<Message>, Error>;
}
