// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! # API Data Models
//!
//! Request, response, and shared value types for the REST API. All types
//! derive `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON
//! handling and OpenAPI documentation.
//!
//! Wire names are camelCase to match the public contract
//! (`aadharNumber`, `relationWithUser`, `linkedUserDetails`, ...).
//!
//! ## Model Categories
//!
//! - **Value types**: [`Address`], [`Gender`], [`Relation`], [`DocumentRecord`],
//!   [`LinkedUserDetails`]
//! - **Requests**: registration, login, profile and status updates
//! - **Responses**: token envelopes and profile wrappers

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Value Types
// =============================================================================

/// Gender recorded on principal and nominee accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Relation of a nominee to their linked principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Relation {
    Spouse,
    Son,
    Daughter,
    Father,
    Mother,
    Brother,
    Sister,
    Other,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Spouse => "Spouse",
            Self::Son => "Son",
            Self::Daughter => "Daughter",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Brother => "Brother",
            Self::Sister => "Sister",
            Self::Other => "Other",
        };
        write!(f, "{label}")
    }
}

fn default_country() -> String {
    "India".to_string()
}

/// Postal address. Every sub-field except `country` must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default = "default_country")]
    pub country: String,
}

/// Kind of evidentiary document a nominee may upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DocumentType {
    #[serde(rename = "Death Certificate")]
    DeathCertificate,
    #[serde(rename = "Medical Document")]
    MedicalDocument,
}

impl DocumentType {
    /// Parse the wire label ("Death Certificate" / "Medical Document").
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Death Certificate" => Some(Self::DeathCertificate),
            "Medical Document" => Some(Self::MedicalDocument),
            _ => None,
        }
    }

    /// The wire label for this document type.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DeathCertificate => "Death Certificate",
            Self::MedicalDocument => "Medical Document",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Review status of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl Default for DocumentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// A document uploaded by a nominee.
///
/// Owned exclusively by one nominee. The underlying file lives under the
/// uploads directory and is removed before the metadata entry on delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Unique document identifier (UUID).
    pub id: String,
    /// Document kind.
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Original file name as uploaded.
    pub file_name: String,
    /// Path of the stored file on disk.
    pub file_path: String,
    /// When the document was uploaded.
    pub upload_date: DateTime<Utc>,
    /// Review status, starts `Pending`.
    #[serde(default)]
    pub status: DocumentStatus,
}

/// Snapshot of the linked principal taken at nomination time.
///
/// This is a deliberate denormalization: the snapshot is immutable at
/// creation and independently mutable per field afterwards (staleness
/// with respect to the principal record is tolerated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkedUserDetails {
    pub name: String,
    pub aadhar_number: String,
    pub phone_number: String,
    pub email: String,
    pub address: Address,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// Pension status at nomination, defaults "Active".
    pub pension_status: String,
    /// Principal's last recorded activity at nomination time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    /// Medical status, defaults "Unknown".
    pub medical_status: String,
    /// Death status, defaults "Alive".
    pub death_status: String,
}

// =============================================================================
// Requests
// =============================================================================

/// Request to register a principal account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Address,
    pub aadhar_number: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
}

/// Request to register a nominee account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterNomineeRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: Address,
    pub aadhar_number: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// Relation of the nominee to the principal.
    pub relation_with_user: Relation,
    /// Aadhar number of the principal being nominated for.
    pub user_aadhar_number: String,
}

/// Login request, shared by principal and nominee login.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Nominee profile update.
///
/// The secret, the nominee's own Aadhar number, and the linked-principal
/// reference are deliberately absent: attempts to change them in the
/// request body are silently dropped at deserialization.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNomineeProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub relation_with_user: Option<Relation>,
}

/// Update of the linked-principal snapshot's derived status fields.
///
/// Touches the snapshot only; the principal record itself is never
/// modified through this path.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkedStatusRequest {
    pub medical_status: Option<String>,
    pub death_status: Option<String>,
}

// =============================================================================
// Responses
// =============================================================================

/// Principal identity echoed back on registration.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Response for `POST /accounts/register`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterUserResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Response for `POST /accounts/login`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Nominee identity echoed back on registration and login.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NomineeSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub relation_with_user: Relation,
    pub user_aadhar_number: String,
}

/// Response for nominee registration and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NomineeAuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user_type: String,
    pub nominee: NomineeSummary,
}

/// Acknowledgement for logout and delete operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_parses_wire_labels() {
        assert_eq!(
            DocumentType::parse("Death Certificate"),
            Some(DocumentType::DeathCertificate)
        );
        assert_eq!(
            DocumentType::parse("Medical Document"),
            Some(DocumentType::MedicalDocument)
        );
        assert_eq!(DocumentType::parse("Tax Return"), None);
    }

    #[test]
    fn document_type_serializes_with_spaces() {
        let json = serde_json::to_string(&DocumentType::DeathCertificate).unwrap();
        assert_eq!(json, r#""Death Certificate""#);
    }

    #[test]
    fn address_defaults_country() {
        let addr: Address = serde_json::from_str(
            r#"{"street":"12 MG Road","city":"Pune","state":"Maharashtra","pincode":"411001"}"#,
        )
        .unwrap();
        assert_eq!(addr.country, "India");
    }

    #[test]
    fn document_record_uses_camel_case_and_type_alias() {
        let record = DocumentRecord {
            id: "doc-1".into(),
            doc_type: DocumentType::MedicalDocument,
            file_name: "scan.pdf".into(),
            file_path: "data/uploads/nominees/file-abc.pdf".into(),
            upload_date: Utc::now(),
            status: DocumentStatus::default(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "Medical Document");
        assert_eq!(value["fileName"], "scan.pdf");
        assert_eq!(value["status"], "Pending");
    }

    #[test]
    fn profile_update_ignores_protected_fields() {
        // Password / aadhar / link fields in the body must not round-trip.
        let update: UpdateNomineeProfileRequest = serde_json::from_str(
            r#"{"name":"New Name","password":"hacked","aadharNumber":"111122223333","userAadharNumber":"999988887777"}"#,
        )
        .unwrap();
        assert_eq!(update.name.as_deref(), Some("New Name"));
    }
}
