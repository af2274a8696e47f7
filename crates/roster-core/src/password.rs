use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use anyhow::anyhow;

use crate::Error;

/// Hashes a password with Argon2id and a fresh random salt, returning the
/// PHC string as opaque bytes for storage. Deliberately slow; callers run
/// this off the async runtime.
pub fn hash(password: &str) -> Result<Vec<u8>, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Internal(anyhow!("password hashing failed: {e}")))?;

    Ok(hash.to_string().into_bytes())
}

/// Verifies a password against a stored hash. Returns `Ok(false)` on a
/// mismatch; a hash that cannot be parsed is an internal error, not a
/// credential failure.
pub fn verify(stored_hash: &[u8], password: &str) -> Result<bool, Error> {
    let encoded = std::str::from_utf8(stored_hash)
        .map_err(|e| Error::Internal(anyhow!("stored password hash is not valid utf-8: {e}")))?;
    let parsed = PasswordHash::new(encoded)
        .map_err(|e| Error::Internal(anyhow!("stored password hash is malformed: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(anyhow!("password verification failed: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash("hunter2-but-longer").unwrap();
        assert!(verify(&stored, "hunter2-but-longer").unwrap());
        assert!(!verify(&stored, "hunter3-but-longer").unwrap());
    }

    #[test]
    fn salts_are_per_call() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_stored_hash_is_internal_error() {
        let err = verify(b"not-a-phc-string", "anything").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }
}
