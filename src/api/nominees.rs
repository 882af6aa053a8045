// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Nominee account endpoints: registration, login, profile, and the
//! linked-principal snapshot.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{issue_nominee_token, NomineeAuth};
use crate::error::ApiError;
use crate::models::{
    LinkedUserDetails, LoginRequest, MessageResponse, NomineeAuthResponse, NomineeSummary,
    RegisterNomineeRequest, UpdateLinkedStatusRequest, UpdateNomineeProfileRequest,
};
use crate::state::AppState;
use crate::storage::{
    NomineeProfile, NomineeRepository, PrincipalRepository, StoredNominee,
};
use crate::validate;

/// bcrypt work factor for nominee secrets.
///
/// Higher than the principal path; inherited behaviour, kept as-is.
const NOMINEE_HASH_COST: u32 = 12;

/// Response for `GET /nominees/profile` and `PUT /nominees/profile`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NomineeProfileResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub nominee: NomineeProfile,
}

/// Response for `PUT /nominees/linked-user/status`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkedStatusResponse {
    pub success: bool,
    pub message: String,
    pub linked_user_details: LinkedUserDetails,
}

fn summary(record: &StoredNominee) -> NomineeSummary {
    NomineeSummary {
        id: record.id.clone(),
        name: record.name.clone(),
        email: record.email.clone(),
        relation_with_user: record.relation_with_user,
        user_aadhar_number: record.user_aadhar_number.clone(),
    }
}

/// Register a nominee account against an existing principal.
///
/// Resolves the linked principal by Aadhar number, snapshots its details
/// into the nominee record, and enforces the 1:1 principal-to-nominee
/// relationship. The storage layer's link claim is the authoritative
/// guard against two nominees racing for the same principal.
#[utoipa::path(
    post,
    path = "/nominees/register",
    tag = "Nominees",
    request_body = RegisterNomineeRequest,
    responses(
        (status = 201, description = "Nominee created", body = NomineeAuthResponse),
        (status = 400, description = "Validation failure, duplicate identity, or already-linked principal"),
        (status = 404, description = "Linked principal not found"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterNomineeRequest>,
) -> Result<(StatusCode, Json<NomineeAuthResponse>), ApiError> {
    let nominee_repo = NomineeRepository::new(&state.store);
    let principal_repo = PrincipalRepository::new(&state.store);

    if nominee_repo.find_by_email(&request.email)?.is_some()
        || nominee_repo.find_by_aadhar(&request.aadhar_number)?.is_some()
    {
        return Err(ApiError::conflict(
            "Nominee with this email or Aadhar number already exists",
        ));
    }

    validate::validate_nominee_registration(&request)?;

    let Some(linked) = principal_repo.find_by_aadhar(&request.user_aadhar_number)? else {
        return Err(ApiError::not_found(
            "No user found with the provided Aadhar number. Please verify the Aadhar number.",
        ));
    };

    if nominee_repo.link_exists(&request.user_aadhar_number) {
        return Err(ApiError::conflict(
            "This user already has a nominee registered",
        ));
    }

    let password_hash =
        bcrypt::hash(&request.password, NOMINEE_HASH_COST).map_err(ApiError::internal)?;

    let now = chrono::Utc::now();
    let record = StoredNominee {
        id: uuid::Uuid::new_v4().to_string(),
        name: request.name,
        email: request.email,
        password_hash,
        address: request.address,
        aadhar_number: request.aadhar_number,
        phone_number: request.phone_number,
        date_of_birth: request.date_of_birth,
        gender: request.gender,
        relation_with_user: request.relation_with_user,
        user_aadhar_number: request.user_aadhar_number,
        linked_user_details: LinkedUserDetails {
            name: linked.name,
            aadhar_number: linked.aadhar_number,
            phone_number: linked.phone_number,
            email: linked.email,
            address: linked.address,
            date_of_birth: linked.date_of_birth,
            gender: linked.gender,
            pension_status: "Active".to_string(),
            last_login: Some(linked.updated_at),
            medical_status: "Unknown".to_string(),
            death_status: "Alive".to_string(),
        },
        is_active: true,
        documents: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    nominee_repo.create(&record)?;

    let token = issue_nominee_token(&state.auth.jwt_secret, &record.id, &record.email)
        .map_err(ApiError::internal)?;

    Ok((
        StatusCode::CREATED,
        Json(NomineeAuthResponse {
            success: true,
            message: "Nominee registered successfully".to_string(),
            token,
            user_type: "nominee".to_string(),
            nominee: summary(&record),
        }),
    ))
}

/// Log in a nominee.
///
/// Rejects deactivated accounts even with valid credentials.
#[utoipa::path(
    post,
    path = "/nominees/login",
    tag = "Nominees",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token", body = NomineeAuthResponse),
        (status = 401, description = "Invalid credentials or deactivated account"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<NomineeAuthResponse>, ApiError> {
    let repo = NomineeRepository::new(&state.store);

    let Some(record) = repo.find_by_email(&request.email)? else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    if !record.is_active {
        return Err(ApiError::unauthorized(
            "Your nominee account has been deactivated. Please contact support.",
        ));
    }

    let matches =
        bcrypt::verify(&request.password, &record.password_hash).map_err(ApiError::internal)?;
    if !matches {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = issue_nominee_token(&state.auth.jwt_secret, &record.id, &record.email)
        .map_err(ApiError::internal)?;

    Ok(Json(NomineeAuthResponse {
        success: true,
        message: "Nominee login successful".to_string(),
        token,
        user_type: "nominee".to_string(),
        nominee: summary(&record),
    }))
}

/// Log out (client-side token discard).
#[utoipa::path(
    post,
    path = "/nominees/logout",
    tag = "Nominees",
    responses((status = 200, body = MessageResponse))
)]
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "Nominee logged out successfully".to_string(),
    })
}

/// Get the authenticated nominee's profile, sans secret.
#[utoipa::path(
    get,
    path = "/nominees/profile",
    tag = "Nominees",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Nominee profile", body = NomineeProfileResponse),
        (status = 401, description = "Missing, invalid, or wrong-kind token"),
        (status = 404, description = "Nominee no longer exists"),
    )
)]
pub async fn get_profile(
    NomineeAuth(nominee): NomineeAuth,
    State(state): State<AppState>,
) -> Result<Json<NomineeProfileResponse>, ApiError> {
    let repo = NomineeRepository::new(&state.store);
    let record = repo
        .get(&nominee.nominee_id)
        .map_err(|_| ApiError::not_found("Nominee not found"))?;

    Ok(Json(NomineeProfileResponse {
        success: true,
        message: None,
        nominee: record.into(),
    }))
}

/// Update the authenticated nominee's profile.
///
/// The secret, the nominee's own Aadhar number, and the linked-principal
/// reference cannot be changed through this route: the request type does
/// not carry them, so any such fields in the body are silently dropped.
#[utoipa::path(
    put,
    path = "/nominees/profile",
    tag = "Nominees",
    security(("bearer" = [])),
    request_body = UpdateNomineeProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = NomineeProfileResponse),
        (status = 400, description = "New email already in use"),
        (status = 404, description = "Nominee no longer exists"),
    )
)]
pub async fn update_profile(
    NomineeAuth(nominee): NomineeAuth,
    State(state): State<AppState>,
    Json(update): Json<UpdateNomineeProfileRequest>,
) -> Result<Json<NomineeProfileResponse>, ApiError> {
    let repo = NomineeRepository::new(&state.store);
    let mut record = repo
        .get(&nominee.nominee_id)
        .map_err(|_| ApiError::not_found("Nominee not found"))?;

    // An email change moves the uniqueness claim to the new address.
    let mut released_email = None;
    if let Some(email) = update.email {
        if email.to_lowercase() != record.email.to_lowercase() {
            let new_claim = state.store.paths().nominee_email_claim(&email);
            state
                .store
                .claim(&new_claim, &record.id)
                .map_err(|_| ApiError::conflict("Nominee with this email already exists"))?;
            released_email = Some(record.email.clone());
        }
        record.email = email;
    }
    if let Some(name) = update.name {
        record.name = name;
    }
    if let Some(address) = update.address {
        record.address = address;
    }
    if let Some(phone_number) = update.phone_number {
        record.phone_number = phone_number;
    }
    if let Some(date_of_birth) = update.date_of_birth {
        record.date_of_birth = date_of_birth;
    }
    if let Some(gender) = update.gender {
        record.gender = gender;
    }
    if let Some(relation) = update.relation_with_user {
        record.relation_with_user = relation;
    }
    record.updated_at = chrono::Utc::now();

    repo.update(&record)?;
    if let Some(old_email) = released_email {
        state
            .store
            .release_claim(state.store.paths().nominee_email_claim(&old_email));
    }

    Ok(Json(NomineeProfileResponse {
        success: true,
        message: Some("Nominee profile updated successfully".to_string()),
        nominee: record.into(),
    }))
}

/// Update the linked-principal snapshot's medical/death status fields.
///
/// The snapshot is the only thing touched; the principal record itself is
/// never modified through this route.
#[utoipa::path(
    put,
    path = "/nominees/linked-user/status",
    tag = "Nominees",
    security(("bearer" = [])),
    request_body = UpdateLinkedStatusRequest,
    responses(
        (status = 200, description = "Updated snapshot", body = LinkedStatusResponse),
        (status = 404, description = "Nominee no longer exists"),
    )
)]
pub async fn update_linked_user_status(
    NomineeAuth(nominee): NomineeAuth,
    State(state): State<AppState>,
    Json(update): Json<UpdateLinkedStatusRequest>,
) -> Result<Json<LinkedStatusResponse>, ApiError> {
    let repo = NomineeRepository::new(&state.store);
    let mut record = repo
        .get(&nominee.nominee_id)
        .map_err(|_| ApiError::not_found("Nominee not found"))?;

    if let Some(medical_status) = update.medical_status {
        record.linked_user_details.medical_status = medical_status;
    }
    if let Some(death_status) = update.death_status {
        record.linked_user_details.death_status = death_status;
    }
    record.updated_at = chrono::Utc::now();
    repo.update(&record)?;

    Ok(Json(LinkedStatusResponse {
        success: true,
        message: "Linked user status updated successfully".to_string(),
        linked_user_details: record.linked_user_details,
    }))
}
