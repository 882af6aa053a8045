// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Axum extractors for authenticated principals and nominees.
//!
//! Use `PrincipalAuth` / `NomineeAuth` in handlers to require a session
//! of the matching kind:
//!
//! ```rust,ignore
//! async fn profile(PrincipalAuth(principal): PrincipalAuth) -> impl IntoResponse {
//!     // principal.principal_id is the verified subject
//! }
//! ```
//!
//! A nominee token presented to a principal route (or vice versa) is
//! rejected with `wrong_token_kind`; one verification path serves both
//! kinds, dispatching on the token's discriminator.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::claims::{AuthenticatedNominee, AuthenticatedPrincipal, SessionKind};
use super::error::AuthError;
use super::tokens::verify_token;
use crate::state::AppState;

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Extractor for principal sessions.
pub struct PrincipalAuth(pub AuthenticatedPrincipal);

impl FromRequestParts<AppState> for PrincipalAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_token(&state.auth.jwt_secret, token)?;

        if claims.kind != SessionKind::Principal {
            return Err(AuthError::WrongTokenKind);
        }

        Ok(PrincipalAuth(AuthenticatedPrincipal {
            principal_id: claims.sub,
        }))
    }
}

/// Extractor for nominee sessions.
pub struct NomineeAuth(pub AuthenticatedNominee);

impl FromRequestParts<AppState> for NomineeAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = verify_token(&state.auth.jwt_secret, token)?;

        if claims.kind != SessionKind::Nominee {
            return Err(AuthError::WrongTokenKind);
        }

        Ok(NomineeAuth(AuthenticatedNominee {
            nominee_id: claims.sub,
            email: claims.email,
        }))
    }
}
