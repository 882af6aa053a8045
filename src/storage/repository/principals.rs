// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Principal account repository.
//!
//! Each principal lives in its own JSON file under `data/principals/`.
//! Email and Aadhar uniqueness are enforced by claim files taken before
//! the record is written; a failed write rolls the claims back.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Address, Gender};

use super::super::{FileStore, StoreError, StoreResult};

/// Principal account record as persisted.
///
/// Contains the password hash; never serialize this type on a read path.
/// Use [`PrincipalProfile`] for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPrincipal {
    /// Unique identifier (UUID).
    pub id: String,
    pub name: String,
    pub email: String,
    /// bcrypt hash of the account secret.
    pub password_hash: String,
    pub address: Address,
    /// Immutable after creation.
    pub aadhar_number: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Principal profile returned to API clients (never includes the secret).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: Address,
    pub aadhar_number: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredPrincipal> for PrincipalProfile {
    fn from(record: StoredPrincipal) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            address: record.address,
            aadhar_number: record.aadhar_number,
            phone_number: record.phone_number,
            date_of_birth: record.date_of_birth,
            gender: record.gender,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Repository for principal account operations.
pub struct PrincipalRepository<'a> {
    store: &'a FileStore,
}

impl<'a> PrincipalRepository<'a> {
    /// Create a new PrincipalRepository.
    pub fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    /// Check if a principal exists.
    pub fn exists(&self, principal_id: &str) -> bool {
        self.store.exists(self.store.paths().principal(principal_id))
    }

    /// Get a principal by id.
    pub fn get(&self, principal_id: &str) -> StoreResult<StoredPrincipal> {
        let path = self.store.paths().principal(principal_id);
        if !self.store.exists(&path) {
            return Err(StoreError::NotFound(format!("Principal {principal_id}")));
        }
        self.store.read_json(path)
    }

    /// Find a principal by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredPrincipal>> {
        let target = email.trim().to_lowercase();
        for id in self.store.list_ids(self.store.paths().principals_dir())? {
            if let Ok(record) = self.get(&id) {
                if record.email.to_lowercase() == target {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Find a principal by Aadhar number.
    ///
    /// This is the linked-entity lookup used during nominee registration.
    pub fn find_by_aadhar(&self, aadhar_number: &str) -> StoreResult<Option<StoredPrincipal>> {
        for id in self.store.list_ids(self.store.paths().principals_dir())? {
            if let Ok(record) = self.get(&id) {
                if record.aadhar_number == aadhar_number {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Create a new principal.
    ///
    /// Takes the email and Aadhar uniqueness claims before writing the
    /// record; on any failure the claims already taken are released, so a
    /// losing concurrent registration leaves no partial state behind.
    ///
    /// # Returns
    /// - `Err(StoreError::AlreadyExists)` when the email or Aadhar number
    ///   is already claimed
    pub fn create(&self, record: &StoredPrincipal) -> StoreResult<()> {
        let paths = self.store.paths();
        let email_claim = paths.principal_email_claim(&record.email);
        let aadhar_claim = paths.principal_aadhar_claim(&record.aadhar_number);

        self.store
            .claim(&email_claim, &record.id)
            .map_err(|e| match e {
                StoreError::AlreadyExists(_) => {
                    StoreError::AlreadyExists(format!("Principal email {}", record.email))
                }
                other => other,
            })?;

        if let Err(e) = self.store.claim(&aadhar_claim, &record.id) {
            self.store.release_claim(&email_claim);
            return Err(match e {
                StoreError::AlreadyExists(_) => StoreError::AlreadyExists(format!(
                    "Principal Aadhar {}",
                    record.aadhar_number
                )),
                other => other,
            });
        }

        if let Err(e) = self.store.write_json(paths.principal(&record.id), record) {
            self.store.release_claim(&email_claim);
            self.store.release_claim(&aadhar_claim);
            return Err(e);
        }

        Ok(())
    }

    /// Update an existing principal record.
    pub fn update(&self, record: &StoredPrincipal) -> StoreResult<()> {
        if !self.exists(&record.id) {
            return Err(StoreError::NotFound(format!("Principal {}", record.id)));
        }
        self.store
            .write_json(self.store.paths().principal(&record.id), record)
    }
}
