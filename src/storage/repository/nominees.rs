// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Nominee account repository.
//!
//! Each nominee lives in its own JSON file under `data/nominees/`,
//! carrying the linked-principal snapshot and the document list inline.
//! Three uniqueness claims guard creation: nominee email, nominee Aadhar,
//! and the 1:1 link to the principal's Aadhar number.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Address, DocumentRecord, Gender, LinkedUserDetails, Relation};

use super::super::{FileStore, StoreError, StoreResult};

fn default_true() -> bool {
    true
}

/// Nominee account record as persisted.
///
/// Contains the password hash; never serialize this type on a read path.
/// Use [`NomineeProfile`] for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNominee {
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
    pub relation_with_user: Relation,
    /// Aadhar number of the linked principal. Immutable after creation.
    pub user_aadhar_number: String,
    /// Snapshot of the principal at nomination time.
    pub linked_user_details: LinkedUserDetails,
    /// Deactivated nominees cannot log in.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Uploaded evidentiary documents.
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Nominee profile returned to API clients (never includes the secret).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NomineeProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: Address,
    pub aadhar_number: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub relation_with_user: Relation,
    pub user_aadhar_number: String,
    pub linked_user_details: LinkedUserDetails,
    pub is_active: bool,
    pub documents: Vec<DocumentRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredNominee> for NomineeProfile {
    fn from(record: StoredNominee) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            address: record.address,
            aadhar_number: record.aadhar_number,
            phone_number: record.phone_number,
            date_of_birth: record.date_of_birth,
            gender: record.gender,
            relation_with_user: record.relation_with_user,
            user_aadhar_number: record.user_aadhar_number,
            linked_user_details: record.linked_user_details,
            is_active: record.is_active,
            documents: record.documents,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Repository for nominee account operations.
pub struct NomineeRepository<'a> {
    store: &'a FileStore,
}

impl<'a> NomineeRepository<'a> {
    /// Create a new NomineeRepository.
    pub fn new(store: &'a FileStore) -> Self {
        Self { store }
    }

    /// Check if a nominee exists.
    pub fn exists(&self, nominee_id: &str) -> bool {
        self.store.exists(self.store.paths().nominee(nominee_id))
    }

    /// Get a nominee by id.
    pub fn get(&self, nominee_id: &str) -> StoreResult<StoredNominee> {
        let path = self.store.paths().nominee(nominee_id);
        if !self.store.exists(&path) {
            return Err(StoreError::NotFound(format!("Nominee {nominee_id}")));
        }
        self.store.read_json(path)
    }

    /// Find a nominee by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredNominee>> {
        let target = email.trim().to_lowercase();
        for id in self.store.list_ids(self.store.paths().nominees_dir())? {
            if let Ok(record) = self.get(&id) {
                if record.email.to_lowercase() == target {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Find a nominee by Aadhar number.
    pub fn find_by_aadhar(&self, aadhar_number: &str) -> StoreResult<Option<StoredNominee>> {
        for id in self.store.list_ids(self.store.paths().nominees_dir())? {
            if let Ok(record) = self.get(&id) {
                if record.aadhar_number == aadhar_number {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// Check whether a principal (by Aadhar number) already has a nominee.
    pub fn link_exists(&self, user_aadhar_number: &str) -> bool {
        self.store
            .claim_exists(self.store.paths().nominee_link_claim(user_aadhar_number))
    }

    /// Create a new nominee.
    ///
    /// Takes the email, Aadhar, and principal-link claims in order before
    /// writing the record; on any failure the claims already taken are
    /// released. The link claim is what guarantees at most one nominee per
    /// principal even under concurrent registration.
    pub fn create(&self, record: &StoredNominee) -> StoreResult<()> {
        let paths = self.store.paths();
        let email_claim = paths.nominee_email_claim(&record.email);
        let aadhar_claim = paths.nominee_aadhar_claim(&record.aadhar_number);
        let link_claim = paths.nominee_link_claim(&record.user_aadhar_number);

        self.store
            .claim(&email_claim, &record.id)
            .map_err(|e| match e {
                StoreError::AlreadyExists(_) => {
                    StoreError::AlreadyExists(format!("Nominee email {}", record.email))
                }
                other => other,
            })?;

        if let Err(e) = self.store.claim(&aadhar_claim, &record.id) {
            self.store.release_claim(&email_claim);
            return Err(match e {
                StoreError::AlreadyExists(_) => {
                    StoreError::AlreadyExists(format!("Nominee Aadhar {}", record.aadhar_number))
                }
                other => other,
            });
        }

        if let Err(e) = self.store.claim(&link_claim, &record.id) {
            self.store.release_claim(&email_claim);
            self.store.release_claim(&aadhar_claim);
            return Err(match e {
                StoreError::AlreadyExists(_) => StoreError::AlreadyExists(format!(
                    "Nominee link for principal {}",
                    record.user_aadhar_number
                )),
                other => other,
            });
        }

        if let Err(e) = self.store.write_json(paths.nominee(&record.id), record) {
            self.store.release_claim(&email_claim);
            self.store.release_claim(&aadhar_claim);
            self.store.release_claim(&link_claim);
            return Err(e);
        }

        Ok(())
    }

    /// Update an existing nominee record.
    ///
    /// The linked-principal reference is immutable; callers must not
    /// change `user_aadhar_number` between get and update.
    pub fn update(&self, record: &StoredNominee) -> StoreResult<()> {
        if !self.exists(&record.id) {
            return Err(StoreError::NotFound(format!("Nominee {}", record.id)));
        }
        self.store
            .write_json(self.store.paths().nominee(&record.id), record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentStatus;
    use crate::models::DocumentType;
    use crate::storage::StorePaths;
    use tempfile::TempDir;
    use uuid::Uuid;

    fn test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let mut store = FileStore::new(StorePaths::new(temp_dir.path()));
        store.initialize().expect("initialize");
        (store, temp_dir)
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

    fn test_nominee(email: &str, aadhar: &str, user_aadhar: &str) -> StoredNominee {
        let now = Utc::now();
        StoredNominee {
            id: Uuid::new_v4().to_string(),
            name: "Ravi Kulkarni".into(),
            email: email.into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            address: sample_address(),
            aadhar_number: aadhar.into(),
            phone_number: "9123456780".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 7, 19).unwrap(),
            gender: Gender::Male,
            relation_with_user: Relation::Son,
            user_aadhar_number: user_aadhar.into(),
            linked_user_details: LinkedUserDetails {
                name: "Asha Kulkarni".into(),
                aadhar_number: user_aadhar.into(),
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
        }
    }

    #[test]
    fn create_and_get_nominee() {
        let (store, _dir) = test_store();
        let repo = NomineeRepository::new(&store);

        let record = test_nominee("ravi@example.com", "987654321098", "123456789012");
        repo.create(&record).unwrap();

        let loaded = repo.get(&record.id).unwrap();
        assert_eq!(loaded.email, record.email);
        assert_eq!(loaded.user_aadhar_number, "123456789012");
        assert_eq!(loaded.linked_user_details.aadhar_number, "123456789012");
        assert!(loaded.is_active);
    }

    #[test]
    fn one_nominee_per_principal() {
        let (store, _dir) = test_store();
        let repo = NomineeRepository::new(&store);

        repo.create(&test_nominee(
            "ravi@example.com",
            "987654321098",
            "123456789012",
        ))
        .unwrap();
        assert!(repo.link_exists("123456789012"));

        let second = repo.create(&test_nominee(
            "meera@example.com",
            "555555555555",
            "123456789012",
        ));
        match second {
            Err(StoreError::AlreadyExists(msg)) => assert!(msg.contains("link")),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
    }

    #[test]
    fn failed_link_claim_rolls_back_email_and_aadhar() {
        let (store, _dir) = test_store();
        let repo = NomineeRepository::new(&store);

        repo.create(&test_nominee(
            "ravi@example.com",
            "987654321098",
            "123456789012",
        ))
        .unwrap();

        // Loses on the link claim, must release its email/aadhar claims.
        let loser = test_nominee("meera@example.com", "555555555555", "123456789012");
        assert!(repo.create(&loser).is_err());

        // Same email and aadhar must be registrable against another principal.
        repo.create(&test_nominee(
            "meera@example.com",
            "555555555555",
            "222222222222",
        ))
        .unwrap();
    }

    #[test]
    fn duplicate_nominee_email_rejected() {
        let (store, _dir) = test_store();
        let repo = NomineeRepository::new(&store);

        repo.create(&test_nominee(
            "ravi@example.com",
            "987654321098",
            "123456789012",
        ))
        .unwrap();

        let result = repo.create(&test_nominee(
            "ravi@example.com",
            "555555555555",
            "222222222222",
        ));
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn update_persists_documents() {
        let (store, _dir) = test_store();
        let repo = NomineeRepository::new(&store);

        let mut record = test_nominee("ravi@example.com", "987654321098", "123456789012");
        repo.create(&record).unwrap();

        record.documents.push(DocumentRecord {
            id: Uuid::new_v4().to_string(),
            doc_type: DocumentType::MedicalDocument,
            file_name: "scan.pdf".into(),
            file_path: "data/uploads/nominees/file-abc.pdf".into(),
            upload_date: Utc::now(),
            status: DocumentStatus::Pending,
        });
        repo.update(&record).unwrap();

        let loaded = repo.get(&record.id).unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.documents[0].status, DocumentStatus::Pending);
    }

    #[test]
    fn profile_never_contains_password_hash() {
        let record = test_nominee("ravi@example.com", "987654321098", "123456789012");
        let profile: NomineeProfile = record.into();

        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["linkedUserDetails"]["aadharNumber"], "123456789012");
        assert_eq!(value["linkedUserDetails"]["pensionStatus"], "Active");
    }
}
