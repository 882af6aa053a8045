// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Shared application state.

use std::sync::Arc;

use crate::notify::Mailer;
use crate::storage::FileStore;

/// Authentication configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for session token signing and verification.
    pub jwt_secret: String,
}

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// File-backed record store.
    pub store: FileStore,
    /// Session token configuration.
    pub auth: AuthConfig,
    /// Outbound alert mail seam.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(store: FileStore, auth: AuthConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            store,
            auth,
            mailer,
        }
    }
}
