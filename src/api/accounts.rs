// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Principal account endpoints: registration, login, profile.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{issue_principal_token, PrincipalAuth};
use crate::error::ApiError;
use crate::models::{
    LoginRequest, MessageResponse, RegisterUserRequest, RegisterUserResponse, LoginResponse,
    UserSummary,
};
use crate::state::AppState;
use crate::storage::{PrincipalProfile, PrincipalRepository, StoredPrincipal};
use crate::validate;

/// bcrypt work factor for principal secrets.
const PRINCIPAL_HASH_COST: u32 = 10;

/// Response for `GET /accounts/profile`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfileResponse {
    pub success: bool,
    pub user: PrincipalProfile,
}

/// Register a principal account.
///
/// Duplicate checks run first so the error can name which identifier
/// collided; the storage layer's uniqueness claims are the authoritative
/// guard and close the race between concurrent registrations.
#[utoipa::path(
    post,
    path = "/accounts/register",
    tag = "Accounts",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterUserResponse),
        (status = 400, description = "Validation failure or duplicate identity"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), ApiError> {
    let repo = PrincipalRepository::new(&state.store);

    if repo.find_by_email(&request.email)?.is_some() {
        return Err(ApiError::conflict("User with this email already exists"));
    }
    if repo.find_by_aadhar(&request.aadhar_number)?.is_some() {
        return Err(ApiError::conflict(
            "User with this Aadhar number already exists",
        ));
    }

    validate::validate_user_registration(&request)?;

    let password_hash =
        bcrypt::hash(&request.password, PRINCIPAL_HASH_COST).map_err(ApiError::internal)?;

    let now = chrono::Utc::now();
    let record = StoredPrincipal {
        id: uuid::Uuid::new_v4().to_string(),
        name: request.name,
        email: request.email,
        password_hash,
        address: request.address,
        aadhar_number: request.aadhar_number,
        phone_number: request.phone_number,
        date_of_birth: request.date_of_birth,
        gender: request.gender,
        created_at: now,
        updated_at: now,
    };
    repo.create(&record)?;

    let token = issue_principal_token(&state.auth.jwt_secret, &record.id)
        .map_err(ApiError::internal)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterUserResponse {
            token,
            user: UserSummary {
                id: record.id,
                name: record.name,
                email: record.email,
            },
        }),
    ))
}

/// Log in a principal.
///
/// Invalid email and invalid password produce the same response.
#[utoipa::path(
    post,
    path = "/accounts/login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token", body = LoginResponse),
        (status = 400, description = "Invalid credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let repo = PrincipalRepository::new(&state.store);

    let Some(record) = repo.find_by_email(&request.email)? else {
        return Err(ApiError::bad_request("Invalid credentials"));
    };

    let matches =
        bcrypt::verify(&request.password, &record.password_hash).map_err(ApiError::internal)?;
    if !matches {
        return Err(ApiError::bad_request("Invalid credentials"));
    }

    let token = issue_principal_token(&state.auth.jwt_secret, &record.id)
        .map_err(ApiError::internal)?;

    Ok(Json(LoginResponse { token }))
}

/// Log out (client-side token discard).
#[utoipa::path(
    post,
    path = "/accounts/logout",
    tag = "Accounts",
    responses((status = 200, body = MessageResponse))
)]
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse {
        success: true,
        message: "Logged out successfully. Please remove the token on the client side".to_string(),
    })
}

/// Get the authenticated principal's profile, sans secret.
#[utoipa::path(
    get,
    path = "/accounts/profile",
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Principal profile", body = UserProfileResponse),
        (status = 401, description = "Missing, invalid, or wrong-kind token"),
        (status = 404, description = "Account no longer exists"),
    )
)]
pub async fn profile(
    PrincipalAuth(principal): PrincipalAuth,
    State(state): State<AppState>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let repo = PrincipalRepository::new(&state.store);
    let record = repo
        .get(&principal.principal_id)
        .map_err(|_| ApiError::not_found("User not found"))?;

    Ok(Json(UserProfileResponse {
        success: true,
        user: record.into(),
    }))
}
