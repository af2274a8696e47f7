use std::sync::Arc;

use tracing::{info, warn};

use roster_types::models::User;

use crate::Error;
use crate::password;
use crate::store::{UserProvider, UserSaver};

/// Account lifecycle rules: registration, credential verification, blocking
/// and listing. Holds no state of its own; consistency is delegated to the
/// store behind the capability traits.
#[derive(Clone)]
pub struct AccountService {
    saver: Arc<dyn UserSaver>,
    provider: Arc<dyn UserProvider>,
}

impl AccountService {
    pub fn new(saver: Arc<dyn UserSaver>, provider: Arc<dyn UserProvider>) -> Self {
        Self { saver, provider }
    }

    /// Hashes the password with a fresh salt and persists the account.
    /// Email format validation is the API layer's concern, not ours.
    pub fn register_new_user(&self, email: &str, password: &str) -> Result<i64, Error> {
        info!(email, "registering new user");

        let password_hash = password::hash(password)?;

        let id = match self.saver.save_user(email, &password_hash) {
            Ok(id) => id,
            Err(Error::UserExists) => {
                warn!(email, "user already exists");
                return Err(Error::UserExists);
            }
            Err(err) => return Err(err),
        };

        info!(user_id = id, "user registered");
        Ok(id)
    }

    /// Binary credential check: Ok means accepted, no token is issued.
    ///
    /// The not-found short-circuit runs before any hashing, so an unknown
    /// email returns faster than a wrong password. Inherited behavior;
    /// the HTTP layer collapses both outcomes to 401.
    pub fn login(&self, email: &str, password: &str) -> Result<(), Error> {
        info!(email, "login attempt");

        let user = self.provider.provide_user(email)?;

        if !password::verify(&user.password_hash, password)? {
            warn!(email, "invalid credentials");
            return Err(Error::InvalidCredentials);
        }

        info!(user_id = user.id, "login accepted");
        Ok(())
    }

    /// One-way flip of the active flag; there is no unblock.
    pub fn block_user(&self, user_id: i64) -> Result<(), Error> {
        info!(user_id, "blocking user");

        match self.saver.block_user_by_id(user_id) {
            Ok(()) => {
                info!(user_id, "user blocked");
                Ok(())
            }
            Err(Error::UserNotFound) => {
                warn!(user_id, "user not found for blocking");
                Err(Error::UserNotFound)
            }
            Err(err) => Err(err),
        }
    }

    pub fn get_user(&self, user_id: i64) -> Result<User, Error> {
        self.provider.get_user_by_id(user_id)
    }

    pub fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, Error> {
        let users = self.provider.list_users(limit, offset)?;
        info!(count = users.len(), "users listed");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{Duration, Utc};

    use super::*;

    /// In-memory stand-in for the relational adapter, enforcing the same
    /// contracts: email uniqueness, zero-rows block detection, newest-first
    /// listing.
    #[derive(Default)]
    struct FakeStore {
        users: Mutex<Vec<User>>,
    }

    impl UserSaver for FakeStore {
        fn save_user(&self, email: &str, password_hash: &[u8]) -> Result<i64, Error> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == email) {
                return Err(Error::UserExists);
            }
            let id = users.len() as i64 + 1;
            // Space creation times out so ordering is unambiguous.
            users.push(User {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_vec(),
                created_at: Utc::now() + Duration::seconds(id),
                is_active: true,
            });
            Ok(id)
        }

        fn block_user_by_id(&self, user_id: i64) -> Result<(), Error> {
            let mut users = self.users.lock().unwrap();
            match users.iter_mut().find(|u| u.id == user_id) {
                Some(user) => {
                    user.is_active = false;
                    Ok(())
                }
                None => Err(Error::UserNotFound),
            }
        }
    }

    impl UserProvider for FakeStore {
        fn provide_user(&self, email: &str) -> Result<User, Error> {
            let users = self.users.lock().unwrap();
            users
                .iter()
                .find(|u| u.email == email)
                .cloned()
                .ok_or(Error::UserNotFound)
        }

        fn get_user_by_id(&self, user_id: i64) -> Result<User, Error> {
            let users = self.users.lock().unwrap();
            users
                .iter()
                .find(|u| u.id == user_id)
                .cloned()
                .ok_or(Error::UserNotFound)
        }

        fn list_users(&self, limit: u32, offset: u32) -> Result<Vec<User>, Error> {
            let mut users = self.users.lock().unwrap().clone();
            users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(users
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }
    }

    fn service() -> AccountService {
        let store = Arc::new(FakeStore::default());
        AccountService::new(store.clone(), store)
    }

    #[test]
    fn register_then_get() {
        let svc = service();

        let id = svc.register_new_user("ann@example.com", "correct horse").unwrap();
        let user = svc.get_user(id).unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.email, "ann@example.com");
        assert!(user.is_active);
        // The stored hash is opaque, never the raw password.
        assert_ne!(user.password_hash, b"correct horse");
    }

    #[test]
    fn duplicate_email_rejected() {
        let svc = service();

        let first = svc.register_new_user("dup@example.com", "pw-one").unwrap();
        let err = svc.register_new_user("dup@example.com", "pw-two").unwrap_err();

        assert!(matches!(err, Error::UserExists));
        // The first registration survives intact.
        assert_eq!(svc.get_user(first).unwrap().email, "dup@example.com");
    }

    #[test]
    fn login_accepts_only_the_registered_password() {
        let svc = service();
        svc.register_new_user("bob@example.com", "the real one").unwrap();

        svc.login("bob@example.com", "the real one").unwrap();

        let err = svc.login("bob@example.com", "the wrong one").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials));
    }

    #[test]
    fn login_unknown_email_is_not_found() {
        let svc = service();

        let err = svc.login("ghost@example.com", "whatever").unwrap_err();
        assert!(matches!(err, Error::UserNotFound));
    }

    #[test]
    fn block_flips_active_flag_once() {
        let svc = service();
        let id = svc.register_new_user("carol@example.com", "pw").unwrap();

        svc.block_user(id).unwrap();
        assert!(!svc.get_user(id).unwrap().is_active);

        let err = svc.block_user(9999).unwrap_err();
        assert!(matches!(err, Error::UserNotFound));
    }

    #[test]
    fn list_users_pages_newest_first() {
        let svc = service();
        svc.register_new_user("u1@example.com", "pw").unwrap();
        svc.register_new_user("u2@example.com", "pw").unwrap();
        svc.register_new_user("u3@example.com", "pw").unwrap();

        let page = svc.list_users(2, 0).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].email, "u3@example.com");
        assert_eq!(page[1].email, "u2@example.com");

        let rest = svc.list_users(2, 2).unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].email, "u1@example.com");
    }
}
