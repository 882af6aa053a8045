// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Path constants and utilities for the storage layout.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Default base directory for all persistent storage.
pub const DATA_ROOT: &str = "data";

/// Storage path utilities.
///
/// ## Layout
///
/// ```text
/// data/
///   principals/{id}.json        # Principal account records
///   nominees/{id}.json          # Nominee account records (incl. documents)
///   index/
///     principal-email/{key}     # Uniqueness claims (empty marker files,
///     principal-aadhar/{key}    #  created with O_EXCL semantics)
///     nominee-email/{key}
///     nominee-aadhar/{key}
///     nominee-link/{key}        # One claim per linked principal aadhar
///   uploads/nominees/           # Uploaded document files
/// ```
#[derive(Debug, Clone)]
pub struct StorePaths {
    root: PathBuf,
}

impl Default for StorePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StorePaths {
    /// Create a new StorePaths with a custom root (useful for testing).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Principal Paths ==========

    /// Directory containing all principal records.
    pub fn principals_dir(&self) -> PathBuf {
        self.root.join("principals")
    }

    /// Path to a specific principal record.
    pub fn principal(&self, principal_id: &str) -> PathBuf {
        self.principals_dir().join(format!("{principal_id}.json"))
    }

    // ========== Nominee Paths ==========

    /// Directory containing all nominee records.
    pub fn nominees_dir(&self) -> PathBuf {
        self.root.join("nominees")
    }

    /// Path to a specific nominee record.
    pub fn nominee(&self, nominee_id: &str) -> PathBuf {
        self.nominees_dir().join(format!("{nominee_id}.json"))
    }

    // ========== Uniqueness Claim Paths ==========

    /// Directory containing all uniqueness claims.
    pub fn index_dir(&self) -> PathBuf {
        self.root.join("index")
    }

    /// Claim on a principal email address.
    pub fn principal_email_claim(&self, email: &str) -> PathBuf {
        self.index_dir().join("principal-email").join(email_key(email))
    }

    /// Claim on a principal Aadhar number.
    pub fn principal_aadhar_claim(&self, aadhar: &str) -> PathBuf {
        self.index_dir().join("principal-aadhar").join(aadhar)
    }

    /// Claim on a nominee email address.
    pub fn nominee_email_claim(&self, email: &str) -> PathBuf {
        self.index_dir().join("nominee-email").join(email_key(email))
    }

    /// Claim on a nominee Aadhar number.
    pub fn nominee_aadhar_claim(&self, aadhar: &str) -> PathBuf {
        self.index_dir().join("nominee-aadhar").join(aadhar)
    }

    /// Claim on the 1:1 principal-to-nominee link, keyed by the linked
    /// principal's Aadhar number.
    pub fn nominee_link_claim(&self, user_aadhar: &str) -> PathBuf {
        self.index_dir().join("nominee-link").join(user_aadhar)
    }

    // ========== Upload Paths ==========

    /// Directory containing uploaded nominee documents.
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads").join("nominees")
    }

    /// Path to a stored upload file.
    pub fn upload_file(&self, stored_name: &str) -> PathBuf {
        self.uploads_dir().join(stored_name)
    }
}

/// Filesystem-safe key for an email address.
///
/// Emails are case-folded and hashed so arbitrary local parts can never
/// escape the index directory.
fn email_key(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
