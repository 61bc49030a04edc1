/// JWT Token Issuance and Verification
///
/// Two token classes share the HS256 algorithm but never a secret:
/// - Access: short-lived, `sub` is the username
/// - Refresh: long-lived, `sub` is `{"refresh_for": username}`
///
/// Verification collapses every failure (bad signature, malformed token,
/// wrong class, expiry) into `None`.

use std::fmt;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::{Claims, Subject};
use crate::configuration::JwtSettings;
use crate::error::AppError;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Which secret a token is signed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Access,
    Refresh,
}

/// HMAC signing secret, keyed for both directions
#[derive(Clone)]
pub struct Secret {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Secret {
    pub fn new(raw: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(raw.as_bytes()),
            decoding: DecodingKey::from_secret(raw.as_bytes()),
        }
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Freshly minted access + refresh tokens
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token issuer and verifier built from immutable settings
#[derive(Debug, Clone)]
pub struct TokenService {
    access: Secret,
    refresh: Secret,
    access_ttl: i64,
    refresh_ttl: i64,
}

/// Current Unix time in seconds
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl TokenService {
    pub fn new(config: &JwtSettings) -> Self {
        Self {
            access: Secret::new(&config.access_secret),
            refresh: Secret::new(&config.refresh_secret),
            access_ttl: config.access_token_expiry,
            refresh_ttl: config.refresh_token_expiry,
        }
    }

    pub fn secret(&self, class: TokenClass) -> &Secret {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_ttl(&self) -> i64 {
        self.access_ttl
    }

    pub fn issue_access(&self, username: &str) -> Result<String, AppError> {
        self.issue_access_at(username, now())
    }

    pub fn issue_access_at(&self, username: &str, now: i64) -> Result<String, AppError> {
        sign(&Claims::access(username, now, self.access_ttl), &self.access)
    }

    pub fn issue_refresh(&self, username: &str) -> Result<String, AppError> {
        self.issue_refresh_at(username, now())
    }

    pub fn issue_refresh_at(&self, username: &str, now: i64) -> Result<String, AppError> {
        sign(&Claims::refresh(username, now, self.refresh_ttl), &self.refresh)
    }

    pub fn issue_pair(&self, username: &str) -> Result<TokenPair, AppError> {
        let now = now();
        Ok(TokenPair {
            access_token: self.issue_access_at(username, now)?,
            refresh_token: self.issue_refresh_at(username, now)?,
        })
    }

    pub fn decode(&self, token: &str, class: TokenClass) -> Option<Claims> {
        self.decode_at(token, class, now())
    }

    /// Decode with the class's secret and require the matching subject shape
    pub fn decode_at(&self, token: &str, class: TokenClass, now: i64) -> Option<Claims> {
        let claims = decode_with(token, self.secret(class), now)?;
        match (class, &claims.sub) {
            (TokenClass::Access, Subject::Access(_))
            | (TokenClass::Refresh, Subject::Refresh { .. }) => Some(claims),
            _ => {
                tracing::warn!(?class, "Token subject does not match its class");
                None
            }
        }
    }

    pub fn is_valid(&self, token: &str, class: TokenClass) -> bool {
        self.decode(token, class).is_some()
    }

    /// Username carried by a valid access token
    pub fn access_subject(&self, token: &str) -> Option<String> {
        self.decode(token, TokenClass::Access)
            .map(|claims| claims.sub.username().to_string())
    }
}

fn sign(claims: &Claims, secret: &Secret) -> Result<String, AppError> {
    encode(&Header::new(ALGORITHM), claims, &secret.encoding)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify signature and expiry against `secret`
///
/// `None` for anything other than a well-formed, correctly signed token
/// whose `exp` is still ahead of `now`.
pub fn decode_with(token: &str, secret: &Secret, now: i64) -> Option<Claims> {
    let mut validation = Validation::new(ALGORITHM);
    // Expiry is compared against the caller's clock below
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp"]);

    let claims = match decode::<Claims>(token, &secret.decoding, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::debug!("JWT validation error: {}", e);
            return None;
        }
    };

    if claims.is_expired_at(now) {
        tracing::debug!(exp = claims.exp, now, "JWT expired");
        return None;
    }

    Some(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_service() -> TokenService {
        TokenService::new(&JwtSettings::new(
            "test-access-secret-at-least-32-characters",
            "test-refresh-secret-at-least-32-characters",
        ))
    }

    #[test]
    fn test_issue_and_decode_access() {
        let service = get_test_service();
        let token = service.issue_access("alice").expect("Failed to generate token");

        assert_eq!(token.split('.').count(), 3);
        let claims = service
            .decode(&token, TokenClass::Access)
            .expect("Failed to validate token");
        assert_eq!(claims.sub, Subject::Access("alice".to_string()));
        assert_eq!(claims.exp - claims.iat, 1800);
        assert_eq!(service.access_subject(&token).as_deref(), Some("alice"));
    }

    #[test]
    fn test_issue_and_decode_refresh() {
        let service = get_test_service();
        let token = service.issue_refresh("alice").expect("Failed to generate token");

        let claims = service
            .decode(&token, TokenClass::Refresh)
            .expect("Failed to validate token");
        assert_eq!(
            claims.sub,
            Subject::Refresh {
                refresh_for: "alice".to_string()
            }
        );
        assert_eq!(claims.exp - claims.iat, 604800);
    }

    #[test]
    fn test_access_token_lifetime() {
        let service = get_test_service();
        let t0 = 1_700_000_000;
        let token = service.issue_access_at("alice", t0).unwrap();

        assert!(service.decode_at(&token, TokenClass::Access, t0).is_some());
        assert!(service
            .decode_at(&token, TokenClass::Access, t0 + 1799)
            .is_some());
        assert!(service
            .decode_at(&token, TokenClass::Access, t0 + 1800)
            .is_none());
        assert!(service
            .decode_at(&token, TokenClass::Access, t0 + 86_400)
            .is_none());
    }

    #[test]
    fn test_expired_token_against_wall_clock() {
        let service = get_test_service();
        let token = service.issue_access_at("alice", now() - 3600).unwrap();

        assert!(!service.is_valid(&token, TokenClass::Access));
        assert!(service.access_subject(&token).is_none());
    }

    #[test]
    fn test_classes_do_not_cross_verify() {
        let service = get_test_service();
        let access = service.issue_access("alice").unwrap();
        let refresh = service.issue_refresh("alice").unwrap();

        assert!(service.decode(&access, TokenClass::Refresh).is_none());
        assert!(service.decode(&refresh, TokenClass::Access).is_none());
    }

    #[test]
    fn test_cross_class_fails_even_with_valid_expiry_window() {
        let service = get_test_service();
        let access = service.issue_access("alice").unwrap();

        // Signature check alone must reject the wrong secret
        assert!(decode_with(&access, service.secret(TokenClass::Refresh), now()).is_none());
        assert!(decode_with(&access, service.secret(TokenClass::Access), now()).is_some());
    }

    #[test]
    fn test_subject_shape_is_enforced() {
        // Same secret for both classes, which configuration validation forbids
        let shared = TokenService::new(&JwtSettings::new("shared", "shared"));
        let refresh = shared.issue_refresh("alice").unwrap();

        assert!(shared.decode(&refresh, TokenClass::Access).is_none());
    }

    #[test]
    fn test_malformed_tokens() {
        let service = get_test_service();

        for token in ["", "invalid.token.here", "a.b", "not-a-jwt"] {
            assert!(!service.is_valid(token, TokenClass::Access), "{}", token);
        }
    }

    #[test]
    fn test_tampered_token() {
        let service = get_test_service();
        let token = service.issue_access("alice").unwrap();

        let tampered = format!("{}X", token);
        assert!(!service.is_valid(&tampered, TokenClass::Access));
    }

    #[test]
    fn test_foreign_secret() {
        let service = get_test_service();
        let other = TokenService::new(&JwtSettings::new("other-access", "other-refresh"));
        let token = other.issue_access("alice").unwrap();

        assert!(!service.is_valid(&token, TokenClass::Access));
    }
}
