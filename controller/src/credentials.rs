// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use crate::models::User;
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

/// Hash a plain password into an argon2id PHC string
pub fn hash_password(password: &str) -> Result<String, ErrorKind> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ErrorKind::PasswordHash(e.to_string()))
}

/// Check a plain password against the stored hash, users without a hash
/// (dataset users) never match
pub fn verify_password(user: &User, password: &str) -> bool {
    let stored = match &user.password_hash {
        Some(stored) => stored,
        None => return false,
    };

    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),

        Err(e) => {
            log::warn!("Corrupted password hash for user({}): {}", user.id, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;

    #[test]
    fn hash_and_verify() -> Result<(), Error> {
        let user = User {
            id: 7,
            password_hash: Some(hash_password("secret")?),
            ..Default::default()
        };

        assert!(verify_password(&user, "secret"));
        assert!(!verify_password(&user, "Secret"));

        Ok(())
    }

    #[test]
    fn salts_differ() -> Result<(), Error> {
        assert_ne!(hash_password("secret")?, hash_password("secret")?);
        Ok(())
    }

    #[test]
    fn no_hash_never_verifies() {
        let user = User::default();
        assert!(!verify_password(&user, ""));

        let user = User {
            password_hash: Some("plaintext".into()),
            ..Default::default()
        };
        assert!(!verify_password(&user, "plaintext"));
    }
}
