/// JWT Claims structure
///
/// Access tokens carry the username directly in `sub`. Refresh tokens wrap
/// it as `{"refresh_for": "<username>"}` so the two can never be mistaken for
/// one another even before the signature is checked.

use serde::{Deserialize, Serialize};

/// Token subject
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Subject {
    Access(String),
    Refresh { refresh_for: String },
}

impl Subject {
    /// Username this subject refers to, whatever the token class
    pub fn username(&self) -> &str {
        match self {
            Subject::Access(username) => username,
            Subject::Refresh { refresh_for } => refresh_for,
        }
    }
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: Subject,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn access(username: &str, now: i64, expiry_seconds: i64) -> Self {
        Self {
            sub: Subject::Access(username.to_string()),
            exp: now.saturating_add(expiry_seconds),
            iat: now,
        }
    }

    pub fn refresh(username: &str, now: i64, expiry_seconds: i64) -> Self {
        Self {
            sub: Subject::Refresh {
                refresh_for: username.to_string(),
            },
            exp: now.saturating_add(expiry_seconds),
            iat: now,
        }
    }

    /// A token is usable strictly before its `exp`
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}
