//! Password hashing and verification using Argon2id

use crate::{config::SecurityConfig, error::AppError};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;

/// Symbols accepted by the password policy.
pub const PASSWORD_SYMBOLS: &str = "#?!@$%^&*-";

// 用户不存在时也执行一次校验，使两条失败路径耗时一致
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    PasswordHasher::new()
        .hash("dummy-password-for-timing")
        .unwrap_or_default()
});

/// Password hasher. The salt is generated per call and embedded in the PHC string.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with the Argon2id defaults (m=19MiB, t=2, p=1)
    pub fn new() -> Self {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT);

        Self { argon2 }
    }

    /// Hash a password
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored hash. A malformed hash simply does not match.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Failed to parse stored password hash: {:?}", e);
                return false;
            }
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Run a verification that can never succeed, for unknown accounts.
    pub fn verify_dummy(&self, password: &str) -> bool {
        self.verify(password, &DUMMY_HASH);
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Strength rules applied to new passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(config.password_min_length)
    }

    /// Minimum length plus one uppercase, one lowercase, one digit and one symbol.
    pub fn is_satisfied_by(&self, password: &str) -> bool {
        password.chars().count() >= self.min_length
            && password.chars().any(|c| c.is_ascii_uppercase())
            && password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "TestPassword123!";

        let hash = hasher.hash(password).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(password, &hash));
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("TestPassword123!").unwrap();

        assert!(!hasher.verify("TestPassword123?", &hash));
        assert!(!hasher.verify("", &hash));
    }

    #[test]
    fn test_hash_is_different_each_time() {
        let hasher = PasswordHasher::new();
        let password = "TestPassword123!";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        // 随机盐导致每次哈希不同
        assert_ne!(hash1, hash2);
        assert!(hasher.verify(password, &hash1));
        assert!(hasher.verify(password, &hash2));
    }

    #[test]
    fn test_verify_malformed_hash_is_false() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify("anything", "not-a-valid-hash"));
        assert!(!hasher.verify("anything", ""));
    }

    #[test]
    fn test_verify_dummy_never_matches() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_dummy("dummy-password-for-timing"));
    }

    #[test]
    fn test_password_policy() {
        let policy = PasswordPolicy::new(12);

        assert!(policy.is_satisfied_by("Abcdef1!2345"));
        // Too short
        assert!(!policy.is_satisfied_by("Abc1!"));
        // No uppercase
        assert!(!policy.is_satisfied_by("abcdef1!2345"));
        // No lowercase
        assert!(!policy.is_satisfied_by("ABCDEF1!2345"));
        // No digit
        assert!(!policy.is_satisfied_by("Abcdefg!hijk"));
        // Symbol outside the accepted set
        assert!(!policy.is_satisfied_by("Abcdef1_2345"));
        assert!(!policy.is_satisfied_by("1234"));
    }

    #[test]
    fn test_password_policy_counts_characters_not_bytes() {
        let policy = PasswordPolicy::new(12);
        // 11 chars, more than 12 bytes
        assert!(!policy.is_satisfied_by("Aé1!ééééééé"));
    }
}
