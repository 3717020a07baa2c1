use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Signed token payload.
///
/// Every field is mandatory: a token missing any of them fails to decode and
/// is reported as malformed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (customer email)
    pub sub: String,

    /// Role names granted to the subject
    pub roles: Vec<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims issued at `issued_at` and expiring `ttl` later.
    pub fn for_subject(
        subject: impl ToString,
        roles: Vec<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expiration = issued_at + ttl;

        Self {
            sub: subject.to_string(),
            roles,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// A token is expired from its expiry second onwards.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

/// Identity proven by a verified token.
///
/// Lives for one request only; nothing about it is stored server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub subject: String,
    pub roles: Vec<String>,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedIdentity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl TryFrom<Claims> for AuthenticatedIdentity {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| TokenError::Malformed(format!("exp out of range: {}", claims.exp)))?;

        Ok(Self {
            subject: claims.sub,
            roles: claims.roles,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_subject() {
        let issued_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::for_subject(
            "alex@x.com",
            vec!["USER".to_string()],
            issued_at,
            Duration::hours(24),
        );

        assert_eq!(claims.sub, "alex@x.com");
        assert_eq!(claims.roles, vec!["USER".to_string()]);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims {
            sub: "alex@x.com".to_string(),
            roles: vec![],
            iat: 900,
            exp: 1000,
        };

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_identity_from_claims() {
        let claims = Claims {
            sub: "alex@x.com".to_string(),
            roles: vec!["USER".to_string()],
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };

        let identity = AuthenticatedIdentity::try_from(claims).unwrap();

        assert_eq!(identity.subject, "alex@x.com");
        assert!(identity.has_role("USER"));
        assert!(!identity.has_role("ADMIN"));
        assert_eq!(identity.expires_at.timestamp(), 1_700_003_600);
    }
}
