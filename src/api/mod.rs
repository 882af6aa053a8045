// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        Address, DocumentRecord, DocumentStatus, DocumentType, Gender, LinkedUserDetails,
        LoginRequest, LoginResponse, MessageResponse, NomineeAuthResponse, NomineeSummary,
        RegisterNomineeRequest, RegisterUserRequest, RegisterUserResponse,
        UpdateLinkedStatusRequest, UpdateNomineeProfileRequest, UserSummary, Relation,
    },
    state::AppState,
    storage::{NomineeProfile, PrincipalProfile},
};

pub mod accounts;
pub mod documents;
pub mod health;
pub mod nominees;

pub fn router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/profile", get(accounts::profile));

    let nominee_routes = Router::new()
        .route("/register", post(nominees::register))
        .route("/login", post(nominees::login))
        .route("/logout", post(nominees::logout))
        .route(
            "/profile",
            get(nominees::get_profile).put(nominees::update_profile),
        )
        .route(
            "/documents/upload",
            post(documents::upload_document)
                .layer(DefaultBodyLimit::max(documents::MAX_UPLOAD_BYTES)),
        )
        .route("/documents", get(documents::list_documents))
        .route(
            "/documents/{document_id}",
            delete(documents::delete_document),
        )
        .route(
            "/linked-user/status",
            put(nominees::update_linked_user_status),
        );

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .nest("/accounts", account_routes)
        .nest("/nominees", nominee_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::register,
        accounts::login,
        accounts::logout,
        accounts::profile,
        nominees::register,
        nominees::login,
        nominees::logout,
        nominees::get_profile,
        nominees::update_profile,
        nominees::update_linked_user_status,
        documents::upload_document,
        documents::list_documents,
        documents::delete_document,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            Address,
            Gender,
            Relation,
            DocumentType,
            DocumentStatus,
            DocumentRecord,
            LinkedUserDetails,
            RegisterUserRequest,
            RegisterNomineeRequest,
            LoginRequest,
            UpdateNomineeProfileRequest,
            UpdateLinkedStatusRequest,
            UserSummary,
            RegisterUserResponse,
            LoginResponse,
            NomineeSummary,
            NomineeAuthResponse,
            MessageResponse,
            PrincipalProfile,
            NomineeProfile,
            accounts::UserProfileResponse,
            nominees::NomineeProfileResponse,
            nominees::LinkedStatusResponse,
            documents::DocumentResponse,
            documents::DocumentsResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Accounts", description = "Principal account registration and login"),
        (name = "Nominees", description = "Nominee registration, login, and profile"),
        (name = "Documents", description = "Evidentiary document intake"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingMailer;
    use crate::state::AuthConfig;
    use crate::storage::{FileStore, StorePaths};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(StorePaths::new(temp_dir.path()));
        store.initialize().unwrap();
        let state = AppState::new(
            store,
            AuthConfig {
                jwt_secret: "test-secret".into(),
            },
            Arc::new(RecordingMailer::default()),
        );

        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
