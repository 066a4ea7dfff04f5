/**
 * Password Hashing
 *
 * bcrypt hashing with a configurable work factor. Hashes embed their own
 * salt and cost, so verification needs nothing but the stored string.
 *
 * bcrypt is CPU-bound, so every operation runs on tokio's blocking pool
 * instead of a runtime worker.
 */

use thiserror::Error;

/// Lowest work factor bcrypt accepts
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts
pub const MAX_COST: u32 = 31;
/// Work factor used when none is configured
pub const DEFAULT_COST: u32 = 12;

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    /// The blocking task panicked or was cancelled
    #[error("password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// bcrypt password hasher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher; the cost is clamped into bcrypt's accepted range
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a fresh random salt
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hash)
    }

    /// Check a plaintext password against a stored hash
    ///
    /// A malformed hash never matches.
    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();
        match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Stored password hash could not be verified");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }

    /// Spend the same work as `verify` when there is no stored hash
    ///
    /// Keeps the response time for unknown accounts in line with wrong
    /// passwords. Always returns `false`.
    pub async fn verify_missing(&self, password: &str) -> bool {
        if let Err(e) = self.hash(password).await {
            tracing::warn!(error = %e, "Placeholder password hash failed");
        }
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(MIN_COST)
    }

    #[tokio::test]
    async fn test_hash_verifies_original_password() {
        let hash = hasher().hash("password123").await.unwrap();
        assert!(hasher().verify("password123", &hash).await);
    }

    #[tokio::test]
    async fn test_hash_rejects_other_password() {
        let hash = hasher().hash("password123").await.unwrap();
        assert!(!hasher().verify("password124", &hash).await);
        assert!(!hasher().verify("", &hash).await);
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let first = hasher().hash("password123").await.unwrap();
        let second = hasher().hash("password123").await.unwrap();
        assert_ne!(first, second);
        assert_ne!(first, "password123");
    }

    #[tokio::test]
    async fn test_malformed_hash_never_matches() {
        assert!(!hasher().verify("password123", "not-a-bcrypt-hash").await);
        assert!(!hasher().verify("password123", "").await);
    }

    #[tokio::test]
    async fn test_missing_hash_never_matches() {
        assert!(!hasher().verify_missing("password123").await);
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(PasswordHasher::new(0).cost(), MIN_COST);
        assert_eq!(PasswordHasher::new(99).cost(), MAX_COST);
        assert_eq!(PasswordHasher::default().cost(), DEFAULT_COST);
    }
}
