// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

use std::{env, net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use benefits_portal_server::api::router;
use benefits_portal_server::config::{
    DATA_DIR_ENV, DEFAULT_DATA_DIR, DEV_JWT_SECRET, HOST_ENV, JWT_SECRET_ENV, PORT_ENV,
};
use benefits_portal_server::notify::{LogMailer, Mailer, SmtpMailer};
use benefits_portal_server::state::{AppState, AuthConfig};
use benefits_portal_server::storage::{FileStore, StorePaths};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    // Initialize storage
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let mut store = FileStore::new(StorePaths::new(&data_dir));
    store
        .initialize()
        .expect("Failed to initialize data directory");
    tracing::info!("storage initialized at {data_dir}");

    // Session token secret
    let jwt_secret = env::var(JWT_SECRET_ENV).unwrap_or_else(|_| {
        tracing::warn!("{JWT_SECRET_ENV} not set, using development fallback");
        DEV_JWT_SECRET.to_string()
    });

    // Alert mailer: SMTP when configured, log-only otherwise
    let mailer: Arc<dyn Mailer> = match SmtpMailer::from_env() {
        Ok(Some(mailer)) => Arc::new(mailer),
        Ok(None) => {
            tracing::warn!("SMTP not configured, document alerts will only be logged");
            Arc::new(LogMailer)
        }
        Err(e) => {
            tracing::warn!("failed to build SMTP transport ({e}), falling back to log-only");
            Arc::new(LogMailer)
        }
    };

    let state = AppState::new(store, AuthConfig { jwt_secret }, mailer);
    let app = router(state);

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Benefits Portal server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, app)
        .await
        .expect("HTTP server failed");
}
