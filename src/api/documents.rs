// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Document intake endpoints.
//!
//! Uploads arrive as multipart (`file` + `type`). The file is persisted
//! first, mirroring the receive-then-validate order of the upload pipe;
//! any validation or lookup failure after that point deletes the stored
//! file before the error is returned, so no orphaned files survive a
//! failed upload.

use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::NomineeAuth;
use crate::error::ApiError;
use crate::models::{DocumentRecord, DocumentStatus, DocumentType, MessageResponse};
use crate::notify::{dispatch_upload_alert, UploadAlert};
use crate::state::AppState;
use crate::storage::{NomineeRepository, StoreError, StoredNominee};

/// Upload size cap (10 MB), enforced through the route's body limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// File extensions accepted for evidentiary documents.
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

/// Response for `POST /nominees/documents/upload`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    pub success: bool,
    pub message: String,
    pub document: DocumentRecord,
}

/// Response for `GET /nominees/documents`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentsResponse {
    pub success: bool,
    pub documents: Vec<DocumentRecord>,
}

fn has_allowed_extension(file_name: &str) -> bool {
    FsPath::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Best-effort removal of a stored upload.
fn remove_stored_file(state: &AppState, path: &FsPath) {
    if let Err(e) = state.store.delete(path) {
        tracing::warn!("failed to remove stored upload {}: {e}", path.display());
    }
}

/// Append a document to a nominee's record.
///
/// The file at `stored_path` is already on disk; every failure path here
/// removes it before returning. On success the alert describing the
/// upload is returned for the caller to dispatch.
pub fn intake_document(
    state: &AppState,
    nominee_id: &str,
    declared_type: Option<&str>,
    original_name: &str,
    stored_path: PathBuf,
    file_size: u64,
) -> Result<(DocumentRecord, UploadAlert), ApiError> {
    let Some(doc_type) = declared_type.and_then(DocumentType::parse) else {
        remove_stored_file(state, &stored_path);
        return Err(ApiError::bad_request(
            "Invalid document type. Must be either \"Death Certificate\" or \"Medical Document\"",
        ));
    };

    let repo = NomineeRepository::new(&state.store);
    let mut nominee = match repo.get(nominee_id) {
        Ok(record) => record,
        Err(StoreError::NotFound(_)) => {
            remove_stored_file(state, &stored_path);
            return Err(ApiError::not_found("Nominee not found"));
        }
        Err(e) => {
            remove_stored_file(state, &stored_path);
            return Err(e.into());
        }
    };

    let now = chrono::Utc::now();
    let record = DocumentRecord {
        id: uuid::Uuid::new_v4().to_string(),
        doc_type,
        file_name: original_name.to_string(),
        file_path: stored_path.to_string_lossy().into_owned(),
        upload_date: now,
        status: DocumentStatus::Pending,
    };

    nominee.documents.push(record.clone());
    nominee.updated_at = now;
    if let Err(e) = repo.update(&nominee) {
        remove_stored_file(state, &stored_path);
        return Err(e.into());
    }

    Ok((record, upload_alert(&nominee, doc_type, original_name, stored_path, file_size, now)))
}

fn upload_alert(
    nominee: &StoredNominee,
    doc_type: DocumentType,
    original_name: &str,
    stored_path: PathBuf,
    file_size: u64,
    uploaded_at: chrono::DateTime<chrono::Utc>,
) -> UploadAlert {
    UploadAlert {
        nominee_name: nominee.name.clone(),
        nominee_email: nominee.email.clone(),
        relation: nominee.relation_with_user.to_string(),
        linked_user_name: nominee.linked_user_details.name.clone(),
        linked_user_aadhar: nominee.linked_user_details.aadhar_number.clone(),
        doc_type,
        file_name: original_name.to_string(),
        file_path: stored_path,
        file_size,
        uploaded_at,
    }
}

/// Upload an evidentiary document for the authenticated nominee.
///
/// The notification is spawned after the persistence step succeeded; its
/// outcome never influences this response.
#[utoipa::path(
    post,
    path = "/nominees/documents/upload",
    tag = "Documents",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Document stored", body = DocumentResponse),
        (status = 400, description = "Missing file, bad extension, or invalid document type"),
        (status = 404, description = "Nominee not found"),
    )
)]
pub async fn upload_document(
    NomineeAuth(nominee): NomineeAuth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentResponse>, ApiError> {
    let mut declared_type: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid type field: {e}")))?;
                declared_type = Some(value);
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read uploaded file: {e}"))
                })?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;

    // The extension filter runs before anything touches disk.
    if !has_allowed_extension(&file_name) {
        return Err(ApiError::bad_request(
            "Only PDF, JPG, and PNG files are allowed",
        ));
    }

    let stored_path = state.store.save_upload(&file_name, &bytes)?;
    let (record, alert) = intake_document(
        &state,
        &nominee.nominee_id,
        declared_type.as_deref(),
        &file_name,
        stored_path,
        bytes.len() as u64,
    )?;

    tokio::spawn(dispatch_upload_alert(state.mailer.clone(), alert));

    Ok(Json(DocumentResponse {
        success: true,
        message: "Document uploaded successfully".to_string(),
        document: record,
    }))
}

/// List the authenticated nominee's documents.
#[utoipa::path(
    get,
    path = "/nominees/documents",
    tag = "Documents",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Document list", body = DocumentsResponse),
        (status = 404, description = "Nominee not found"),
    )
)]
pub async fn list_documents(
    NomineeAuth(nominee): NomineeAuth,
    State(state): State<AppState>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let repo = NomineeRepository::new(&state.store);
    let record = repo
        .get(&nominee.nominee_id)
        .map_err(|_| ApiError::not_found("Nominee not found"))?;

    Ok(Json(DocumentsResponse {
        success: true,
        documents: record.documents,
    }))
}

/// Delete one of the authenticated nominee's documents.
///
/// The stored file is removed first, best-effort: a missing file or an
/// I/O failure is logged and metadata removal proceeds regardless.
#[utoipa::path(
    delete,
    path = "/nominees/documents/{document_id}",
    tag = "Documents",
    security(("bearer" = [])),
    params(("document_id" = String, Path, description = "Document identifier")),
    responses(
        (status = 200, description = "Document deleted", body = MessageResponse),
        (status = 404, description = "Nominee or document not found"),
    )
)]
pub async fn delete_document(
    NomineeAuth(nominee): NomineeAuth,
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = NomineeRepository::new(&state.store);
    let mut record = repo
        .get(&nominee.nominee_id)
        .map_err(|_| ApiError::not_found("Nominee not found"))?;

    let Some(index) = record.documents.iter().position(|d| d.id == document_id) else {
        return Err(ApiError::not_found("Document not found"));
    };

    let document = record.documents.remove(index);
    let file_path = PathBuf::from(&document.file_path);
    if state.store.exists(&file_path) {
        remove_stored_file(&state, &file_path);
    }

    record.updated_at = chrono::Utc::now();
    repo.update(&record)?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Document deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::AuthenticatedNominee;
    use crate::models::{Address, Gender, LinkedUserDetails, Relation};
    use crate::notify::testing::RecordingMailer;
    use crate::state::AuthConfig;
    use crate::storage::{FileStore, StorePaths};
    use axum::http::StatusCode;
    use chrono::{NaiveDate, Utc};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state_with_mailer(mailer: Arc<RecordingMailer>) -> (AppState, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut store = FileStore::new(StorePaths::new(temp_dir.path()));
        store.initialize().expect("initialize");
        let state = AppState::new(
            store,
            AuthConfig {
                jwt_secret: "test-secret".to_string(),
            },
            mailer,
        );
        (state, temp_dir)
    }

    fn test_state() -> (AppState, TempDir) {
        test_state_with_mailer(Arc::new(RecordingMailer::default()))
    }

    fn sample_address() -> Address {
        Address {
            street: "12 MG Road".into(),
            city: "Pune".into(),
            state: "Maharashtra".into(),
            pincode: "411001".into(),
            country: "India".into(),
        }
    }

    fn seed_nominee(state: &AppState) -> StoredNominee {
        let now = Utc::now();
        let record = StoredNominee {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Ravi Kulkarni".into(),
            email: "ravi@example.com".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            address: sample_address(),
            aadhar_number: "987654321098".into(),
            phone_number: "9123456780".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 7, 19).unwrap(),
            gender: Gender::Male,
            relation_with_user: Relation::Son,
            user_aadhar_number: "123456789012".into(),
            linked_user_details: LinkedUserDetails {
                name: "Asha Kulkarni".into(),
                aadhar_number: "123456789012".into(),
                phone_number: "9876543210".into(),
                email: "asha@example.com".into(),
                address: sample_address(),
                date_of_birth: NaiveDate::from_ymd_opt(1960, 4, 2).unwrap(),
                gender: Gender::Female,
                pension_status: "Active".into(),
                last_login: Some(now),
                medical_status: "Unknown".into(),
                death_status: "Alive".into(),
            },
            is_active: true,
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        NomineeRepository::new(&state.store)
            .create(&record)
            .expect("seed nominee");
        record
    }

    fn auth_for(record: &StoredNominee) -> NomineeAuth {
        NomineeAuth(AuthenticatedNominee {
            nominee_id: record.id.clone(),
            email: Some(record.email.clone()),
        })
    }

    #[test]
    fn extension_filter_accepts_documents_only() {
        assert!(has_allowed_extension("scan.pdf"));
        assert!(has_allowed_extension("photo.JPG"));
        assert!(has_allowed_extension("photo.jpeg"));
        assert!(has_allowed_extension("photo.png"));
        assert!(!has_allowed_extension("macro.exe"));
        assert!(!has_allowed_extension("noextension"));
    }

    #[tokio::test]
    async fn intake_rejects_invalid_type_and_removes_file() {
        let (state, _dir) = test_state();
        let nominee = seed_nominee(&state);

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        let err = intake_document(
            &state,
            &nominee.id,
            Some("Tax Return"),
            "scan.pdf",
            stored.clone(),
            9,
        )
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(!state.store.exists(&stored));
        let record = NomineeRepository::new(&state.store).get(&nominee.id).unwrap();
        assert!(record.documents.is_empty());
    }

    #[tokio::test]
    async fn intake_rejects_missing_type_and_removes_file() {
        let (state, _dir) = test_state();
        let nominee = seed_nominee(&state);

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        let err =
            intake_document(&state, &nominee.id, None, "scan.pdf", stored.clone(), 9).unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(!state.store.exists(&stored));
    }

    #[tokio::test]
    async fn intake_rejects_unknown_nominee_and_removes_file() {
        let (state, _dir) = test_state();

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        let err = intake_document(
            &state,
            "missing",
            Some("Medical Document"),
            "scan.pdf",
            stored.clone(),
            9,
        )
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(!state.store.exists(&stored));
    }

    #[tokio::test]
    async fn intake_appends_pending_record_and_builds_alert() {
        let (state, _dir) = test_state();
        let nominee = seed_nominee(&state);

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        let (record, alert) = intake_document(
            &state,
            &nominee.id,
            Some("Medical Document"),
            "scan.pdf",
            stored.clone(),
            9,
        )
        .expect("intake succeeds");

        assert_eq!(record.status, DocumentStatus::Pending);
        assert_eq!(record.doc_type, DocumentType::MedicalDocument);
        assert_eq!(record.file_name, "scan.pdf");
        assert!(state.store.exists(&stored));

        assert_eq!(alert.nominee_email, "ravi@example.com");
        assert_eq!(alert.linked_user_name, "Asha Kulkarni");
        assert_eq!(alert.linked_user_aadhar, "123456789012");

        let reloaded = NomineeRepository::new(&state.store).get(&nominee.id).unwrap();
        assert_eq!(reloaded.documents.len(), 1);
    }

    #[tokio::test]
    async fn persisted_upload_survives_failing_mail_transport() {
        let mailer = Arc::new(RecordingMailer::failing());
        let (state, _dir) = test_state_with_mailer(mailer.clone());
        let nominee = seed_nominee(&state);

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        let (_, alert) = intake_document(
            &state,
            &nominee.id,
            Some("Medical Document"),
            "scan.pdf",
            stored,
            9,
        )
        .unwrap();

        // The dispatcher is invoked exactly once and the failure is swallowed.
        dispatch_upload_alert(state.mailer.clone(), alert).await;
        assert_eq!(mailer.call_count(), 1);

        let record = NomineeRepository::new(&state.store).get(&nominee.id).unwrap();
        assert_eq!(record.documents.len(), 1);
    }

    #[tokio::test]
    async fn list_returns_documents() {
        let (state, _dir) = test_state();
        let nominee = seed_nominee(&state);

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        intake_document(
            &state,
            &nominee.id,
            Some("Death Certificate"),
            "scan.pdf",
            stored,
            9,
        )
        .unwrap();

        let Json(response) = list_documents(auth_for(&nominee), State(state.clone()))
            .await
            .expect("list succeeds");
        assert_eq!(response.documents.len(), 1);
        assert_eq!(
            response.documents[0].doc_type,
            DocumentType::DeathCertificate
        );
    }

    #[tokio::test]
    async fn delete_removes_file_and_metadata() {
        let (state, _dir) = test_state();
        let nominee = seed_nominee(&state);

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        let (record, _) = intake_document(
            &state,
            &nominee.id,
            Some("Medical Document"),
            "scan.pdf",
            stored.clone(),
            9,
        )
        .unwrap();

        delete_document(
            auth_for(&nominee),
            State(state.clone()),
            Path(record.id.clone()),
        )
        .await
        .expect("delete succeeds");

        assert!(!state.store.exists(&stored));
        let reloaded = NomineeRepository::new(&state.store).get(&nominee.id).unwrap();
        assert!(reloaded.documents.is_empty());
    }

    #[tokio::test]
    async fn delete_proceeds_when_file_is_already_gone() {
        let (state, _dir) = test_state();
        let nominee = seed_nominee(&state);

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        let (record, _) = intake_document(
            &state,
            &nominee.id,
            Some("Medical Document"),
            "scan.pdf",
            stored.clone(),
            9,
        )
        .unwrap();

        // Remove the file out-of-band; metadata removal must still work.
        std::fs::remove_file(&stored).unwrap();

        delete_document(
            auth_for(&nominee),
            State(state.clone()),
            Path(record.id),
        )
        .await
        .expect("delete succeeds despite missing file");

        let reloaded = NomineeRepository::new(&state.store).get(&nominee.id).unwrap();
        assert!(reloaded.documents.is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_document_is_404_without_side_effects() {
        let (state, _dir) = test_state();
        let nominee = seed_nominee(&state);

        let stored = state.store.save_upload("scan.pdf", b"pdf bytes").unwrap();
        intake_document(
            &state,
            &nominee.id,
            Some("Medical Document"),
            "scan.pdf",
            stored.clone(),
            9,
        )
        .unwrap();

        let err = delete_document(
            auth_for(&nominee),
            State(state.clone()),
            Path("no-such-document".to_string()),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(state.store.exists(&stored));
        let reloaded = NomineeRepository::new(&state.store).get(&nominee.id).unwrap();
        assert_eq!(reloaded.documents.len(), 1);
    }
}
