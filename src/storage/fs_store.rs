// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Filesystem-backed JSON store.
//!
//! Records are individual JSON files written atomically (temp file +
//! rename). Uniqueness invariants (email, Aadhar number, one nominee per
//! principal) are enforced at this layer through claim files created with
//! `O_CREAT|O_EXCL` semantics, so two concurrent writers cannot both
//! register the same identity: the loser's claim fails with
//! [`StoreError::AlreadyExists`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::StorePaths;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Entity (or uniqueness claim) already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// Store not initialized
    #[error("Store not initialized")]
    NotInitialized,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Filesystem store for account records, uniqueness claims, and uploads.
#[derive(Debug, Clone)]
pub struct FileStore {
    paths: StorePaths,
    initialized: bool,
}

impl FileStore {
    /// Create a new FileStore.
    ///
    /// Does NOT create the directory structure. Call `initialize()` first.
    pub fn new(paths: StorePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the store paths.
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Initialize the storage directory structure.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn initialize(&mut self) -> StoreResult<()> {
        let dirs = [
            self.paths.principals_dir(),
            self.paths.nominees_dir(),
            self.paths.index_dir(),
            self.paths.uploads_dir(),
        ];

        for dir in dirs {
            fs::create_dir_all(&dir)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Check that the data directory is writable.
    ///
    /// Performs a write-read-delete round trip.
    pub fn health_check(&self) -> StoreResult<()> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }

        let test_file = self.paths.root().join(".health_check");
        let test_data = b"health_check_data";

        fs::write(&test_file, test_data)?;
        let read_data = fs::read(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != test_data {
            return Err(StoreError::Io(io::Error::other(
                "health check data mismatch",
            )));
        }

        Ok(())
    }

    // ========== Generic JSON Operations ==========

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StoreResult<T> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StoreResult<()> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Check if a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().exists()
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StoreResult<()> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// List the ids (file stems) of all `.json` files in a directory.
    pub fn list_ids(&self, dir: impl AsRef<Path>) -> StoreResult<Vec<String>> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) {
                    ids.push(id.to_string());
                }
            }
        }
        Ok(ids)
    }

    // ========== Uniqueness Claims ==========

    /// Claim a uniqueness marker for `owner_id`.
    ///
    /// The marker file is created with `create_new`, which fails when the
    /// claim is already held, so at most one record can ever own a given
    /// email / Aadhar number / link.
    pub fn claim(&self, path: impl AsRef<Path>, owner_id: &str) -> StoreResult<()> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| {
                if e.kind() == io::ErrorKind::AlreadyExists {
                    StoreError::AlreadyExists(format!("Claim {}", path.display()))
                } else {
                    StoreError::Io(e)
                }
            })?;
        file.write_all(owner_id.as_bytes())?;
        Ok(())
    }

    /// Release a uniqueness claim (rollback path for failed registration).
    ///
    /// Releasing a claim that was never taken is not an error.
    pub fn release_claim(&self, path: impl AsRef<Path>) {
        if let Err(e) = fs::remove_file(path.as_ref()) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("failed to release claim {}: {e}", path.as_ref().display());
            }
        }
    }

    /// Check whether a uniqueness claim is held.
    pub fn claim_exists(&self, path: impl AsRef<Path>) -> bool {
        self.exists(path)
    }

    // ========== Upload Files ==========

    /// Persist an uploaded file under the uploads directory.
    ///
    /// The stored name is unique per upload (`file-{uuid}{ext}`) so
    /// concurrent uploads of identically-named files never collide.
    /// Returns the stored path.
    pub fn save_upload(&self, original_name: &str, bytes: &[u8]) -> StoreResult<std::path::PathBuf> {
        if !self.initialized {
            return Err(StoreError::NotInitialized);
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();
        let stored_name = format!("file-{}{ext}", Uuid::new_v4());
        let path = self.paths.upload_file(&stored_name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)?;
        Ok(path)
    }
}
