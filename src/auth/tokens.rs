// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Session token issuance and verification (HS256).
//!
//! Principal sessions live for one hour; nominee sessions for seven days.
//! The asymmetry is inherited behaviour, kept as-is. There is no
//! revocation list: logout is client-side token discard only.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::{SessionClaims, SessionKind};
use super::error::AuthError;

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Principal session lifetime.
pub const PRINCIPAL_SESSION_HOURS: i64 = 1;

/// Nominee session lifetime.
pub const NOMINEE_SESSION_DAYS: i64 = 7;

/// Sign a set of claims into a token string.
pub(crate) fn sign(secret: &str, claims: &SessionClaims) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::InternalError(e.to_string()))
}

/// Issue a one-hour principal session token.
pub fn issue_principal_token(secret: &str, principal_id: &str) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: principal_id.to_string(),
        kind: SessionKind::Principal,
        email: None,
        iat: now.timestamp(),
        exp: (now + Duration::hours(PRINCIPAL_SESSION_HOURS)).timestamp(),
    };
    sign(secret, &claims)
}

/// Issue a seven-day nominee session token.
pub fn issue_nominee_token(
    secret: &str,
    nominee_id: &str,
    email: &str,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: nominee_id.to_string(),
        kind: SessionKind::Nominee,
        email: Some(email.to_string()),
        iat: now.timestamp(),
        exp: (now + Duration::days(NOMINEE_SESSION_DAYS)).timestamp(),
    };
    sign(secret, &claims)
}

/// Verify a token and return its claims.
///
/// Rejects expired and badly-signed tokens. Kind dispatch happens at the
/// extractor, not here.
pub fn verify_token(secret: &str, token: &str) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = CLOCK_SKEW_LEEWAY;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::MalformedToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn principal_token_round_trips() {
        let token = issue_principal_token(SECRET, "p-1").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, "p-1");
        assert_eq!(claims.kind, SessionKind::Principal);
        assert!(claims.email.is_none());
        // Expiry one hour out, give or take the test's own runtime.
        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, 3600);
    }

    #[test]
    fn nominee_token_round_trips_with_seven_days() {
        let token = issue_nominee_token(SECRET, "n-1", "ravi@example.com").unwrap();
        let claims = verify_token(SECRET, &token).unwrap();

        assert_eq!(claims.sub, "n-1");
        assert_eq!(claims.kind, SessionKind::Nominee);
        assert_eq!(claims.email.as_deref(), Some("ravi@example.com"));
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
    }

    #[test]
    fn expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "p-1".into(),
            kind: SessionKind::Principal,
            email: None,
            iat: now - 7200,
            // Past the 60s leeway.
            exp: now - 3600,
        };
        let token = sign(SECRET, &claims).unwrap();

        let result = verify_token(SECRET, &token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_principal_token(SECRET, "p-1").unwrap();
        let result = verify_token("other-secret", &token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn garbage_token_rejected() {
        let result = verify_token(SECRET, "not.a.token");
        assert!(matches!(
            result,
            Err(AuthError::MalformedToken) | Err(AuthError::InvalidSignature)
        ));
    }
}
