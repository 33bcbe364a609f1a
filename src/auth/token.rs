//! Session tokens: HS256, 24-hour expiry, stateless.
//!
//! Verification is a pure signature + expiry check. There is no revocation
//! list; a token stays valid until it expires no matter what happens to the
//! account in the meantime.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Fixed token lifetime.
const TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Signed token payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub iat: u64,
    pub exp: u64,
}

/// Issue a token for `user_id`, valid for 24 hours.
pub fn issue_token(secret: &str, user_id: u64) -> Result<String, jsonwebtoken::errors::Error> {
    issue_with_ttl(secret, user_id, TOKEN_TTL_SECS)
}

fn issue_with_ttl(
    secret: &str,
    user_id: u64,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = jsonwebtoken::get_current_timestamp();
    let claims = Claims {
        user_id,
        iat: now,
        exp: now + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token, returning the embedded user id.
///
/// `None` covers every failure mode: bad signature, malformed token,
/// expired. Callers do not need to distinguish them.
pub fn verify_token(secret: &str, token: &str) -> Option<u64> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn round_trip_resolves_same_user() {
        let token = issue_token(SECRET, 7).unwrap();
        assert_eq!(verify_token(SECRET, &token), Some(7));
    }

    #[test]
    fn corrupted_signature_rejected() {
        let mut token = issue_token(SECRET, 7).unwrap();
        token.push('x');
        assert_eq!(verify_token(SECRET, &token), None);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token(SECRET, 7).unwrap();
        assert_eq!(verify_token("another-secret", &token), None);
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(verify_token(SECRET, "not.a.token"), None);
    }

    #[test]
    fn expired_token_rejected() {
        // Zero TTL plus default leeway would still pass, so sign a claim
        // that expired well in the past.
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            user_id: 7,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(verify_token(SECRET, &token), None);
    }
}
