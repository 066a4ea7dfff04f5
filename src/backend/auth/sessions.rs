/**
 * Session Management and JWT Tokens
 *
 * This module issues and verifies the HS256 tokens that carry a session.
 * Every session is a pair: a short-lived access token presented as a bearer
 * credential, and a longer-lived refresh token exchanged for a new pair.
 * The `typ` claim keeps the two from being used interchangeably.
 *
 * Expiry is checked with zero leeway.
 */

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::{Role, User};

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
/// Default refresh token lifetime (7 days)
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Which half of a session a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Role at issuance
    pub role: Role,
    /// Access or refresh
    pub typ: TokenKind,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::InvalidSubject)
    }

    /// Identity carried by the token
    pub fn payload(&self) -> Result<TokenPayload, TokenError> {
        Ok(TokenPayload {
            user_id: self.user_id()?,
            email: self.email.clone(),
            role: self.role,
        })
    }
}

/// Identity embedded into a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&User> for TokenPayload {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// A freshly issued access/refresh pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed, expired, or otherwise rejected by the decoder
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("expected a {expected:?} token, got {found:?}")]
    WrongKind { expected: TokenKind, found: TokenKind },

    #[error("token subject is not a user id")]
    InvalidSubject,

    #[error("invalid token configuration: {0}")]
    Config(String),
}

/// Issues and verifies session tokens under a single secret
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service
    ///
    /// # Errors
    ///
    /// * `Config` - the secret is empty, a lifetime is zero, or the access
    ///   lifetime is not shorter than the refresh lifetime
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Config("signing secret must not be empty".to_string()));
        }
        if access_ttl.as_secs() == 0 {
            return Err(TokenError::Config("access token lifetime must be at least one second".to_string()));
        }
        if access_ttl >= refresh_ttl {
            return Err(TokenError::Config(
                "access token lifetime must be shorter than refresh token lifetime".to_string(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        self.issue(payload, TokenKind::Access)
    }

    pub fn issue_refresh(&self, payload: &TokenPayload) -> Result<String, TokenError> {
        self.issue(payload, TokenKind::Refresh)
    }

    pub fn issue_pair(&self, payload: &TokenPayload) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue_access(payload)?,
            refresh_token: self.issue_refresh(payload)?,
        })
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Verify a token and require it to be of the given kind
    pub fn verify_kind(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.typ != expected {
            return Err(TokenError::WrongKind {
                expected,
                found: claims.typ,
            });
        }
        Ok(claims)
    }

    fn issue(&self, payload: &TokenPayload, kind: TokenKind) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: payload.user_id.to_string(),
            email: payload.email.clone(),
            role: payload.role,
            typ: kind,
            iat: now,
            exp: now + ttl.as_secs(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;

    const SECRET: &str = "test-secret";

    fn service() -> TokenService {
        TokenService::new(SECRET, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL).unwrap()
    }

    fn payload() -> TokenPayload {
        TokenPayload {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let payload = payload();
        let token = service().issue_access(&payload).unwrap();

        let claims = service().verify(&token).unwrap();
        assert_eq!(claims.payload().unwrap(), payload);
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, DEFAULT_ACCESS_TTL.as_secs());
    }

    #[test]
    fn test_refresh_token_outlives_access_token() {
        let pair = service().issue_pair(&payload()).unwrap();
        let access = service().verify(&pair.access_token).unwrap();
        let refresh = service().verify(&pair.refresh_token).unwrap();

        assert!(refresh.exp > access.exp);
        assert_eq!(refresh.typ, TokenKind::Refresh);
    }

    #[test]
    fn test_verify_kind_rejects_other_kind() {
        let pair = service().issue_pair(&payload()).unwrap();

        assert_matches!(
            service().verify_kind(&pair.refresh_token, TokenKind::Access),
            Err(TokenError::WrongKind { expected: TokenKind::Access, found: TokenKind::Refresh })
        );
        assert!(service().verify_kind(&pair.access_token, TokenKind::Access).is_ok());
    }

    #[test]
    fn test_token_expires() {
        let short = TokenService::new(SECRET, Duration::from_secs(1), Duration::from_secs(60)).unwrap();
        let token = short.issue_access(&payload()).unwrap();
        assert!(short.verify(&token).is_ok());

        std::thread::sleep(Duration::from_millis(2100));
        assert_matches!(short.verify(&token), Err(TokenError::Invalid(_)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service().issue_access(&payload()).unwrap();
        let other = TokenService::new("other-secret", DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(service().verify("invalid.token.here").is_err());
        assert!(service().verify("").is_err());
    }

    #[test]
    fn test_invalid_configuration() {
        assert_matches!(
            TokenService::new("", DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL),
            Err(TokenError::Config(_))
        );
        assert_matches!(
            TokenService::new(SECRET, DEFAULT_REFRESH_TTL, DEFAULT_ACCESS_TTL),
            Err(TokenError::Config(_))
        );
        assert_matches!(
            TokenService::new(SECRET, Duration::ZERO, DEFAULT_REFRESH_TTL),
            Err(TokenError::Config(_))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn tampered_payload_is_rejected(index in 0usize..4096, replacement in "[A-Za-z0-9_-]") {
            let service = service();
            let token = service.issue_access(&payload()).unwrap();
            let parts: Vec<&str> = token.split('.').collect();
            prop_assert_eq!(parts.len(), 3);

            let body = parts[1];
            let position = index % body.len();
            let original = &body[position..position + 1];
            prop_assume!(original != replacement.as_str());

            let mut tampered = body.to_string();
            tampered.replace_range(position..position + 1, &replacement);
            let forged = format!("{}.{}.{}", parts[0], tampered, parts[2]);

            prop_assert!(service.verify(&forged).is_err());
        }
    }
}
