// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! # Authentication Module
//!
//! Session tokens for the benefits portal API.
//!
//! ## Auth Flow
//!
//! 1. Registration or login issues a signed HS256 token
//! 2. Clients send `Authorization: Bearer <token>`
//! 3. Extractors verify the signature and expiry, then dispatch on the
//!    entity-kind discriminator:
//!    - `kind: "principal"` (or absent) → principal routes
//!    - `kind: "nominee"` → nominee routes
//!
//! ## Security
//!
//! - Principal sessions expire after 1 hour, nominee sessions after 7 days
//! - Clock skew tolerance is 60 seconds
//! - No revocation list: logout is client-side token discard

pub mod claims;
pub mod error;
pub mod extractor;
pub mod tokens;

pub use claims::{AuthenticatedNominee, AuthenticatedPrincipal, SessionClaims, SessionKind};
pub use error::AuthError;
pub use extractor::{NomineeAuth, PrincipalAuth};
pub use tokens::{issue_nominee_token, issue_principal_token, verify_token};
