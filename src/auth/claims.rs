// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Session token claims and authenticated identities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Entity kind carried in a session token.
///
/// Principal and nominee sessions share one token format; the kind is the
/// tagged discriminator dispatched on at the authentication boundary. An
/// absent `kind` claim means a principal session (older principal tokens
/// never carried the field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Principal,
    Nominee,
}

impl Default for SessionKind {
    fn default() -> Self {
        Self::Principal
    }
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: principal or nominee id.
    pub sub: String,

    /// Entity kind; absent implies principal.
    #[serde(default)]
    pub kind: SessionKind,

    /// Account email (nominee tokens only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Authenticated principal identity extracted from a verified token.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    pub principal_id: String,
}

/// Authenticated nominee identity extracted from a verified token.
#[derive(Debug, Clone)]
pub struct AuthenticatedNominee {
    pub nominee_id: String,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_kind_means_principal() {
        let claims: SessionClaims = serde_json::from_str(
            r#"{"sub":"p-1","iat":1700000000,"exp":1700003600}"#,
        )
        .unwrap();
        assert_eq!(claims.kind, SessionKind::Principal);
        assert!(claims.email.is_none());
    }

    #[test]
    fn nominee_kind_round_trips() {
        let claims = SessionClaims {
            sub: "n-1".into(),
            kind: SessionKind::Nominee,
            email: Some("ravi@example.com".into()),
            iat: 1700000000,
            exp: 1700604800,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["kind"], "nominee");

        let back: SessionClaims = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind, SessionKind::Nominee);
        assert_eq!(back.email.as_deref(), Some("ravi@example.com"));
    }

    #[test]
    fn principal_claims_omit_email() {
        let claims = SessionClaims {
            sub: "p-1".into(),
            kind: SessionKind::Principal,
            email: None,
            iat: 1700000000,
            exp: 1700003600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("email").is_none());
    }
}
