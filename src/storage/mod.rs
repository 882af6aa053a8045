// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! # Storage Module
//!
//! Persistent storage for account records and uploaded documents, backed
//! by plain JSON files under the data directory.
//!
//! ## Storage Layout
//!
//! ```text
//! data/
//!   principals/{id}.json    # Principal account records
//!   nominees/{id}.json      # Nominee records (snapshot + documents inline)
//!   index/                  # Uniqueness claims (create-new marker files)
//!   uploads/nominees/       # Uploaded document files
//! ```
//!
//! ## Uniqueness
//!
//! Email, Aadhar, and principal-link uniqueness are enforced here, at the
//! storage layer, through exclusive claim files, not by service-layer
//! read-then-write checks. Concurrent duplicate registrations lose on the
//! claim and surface as [`StoreError::AlreadyExists`].

pub mod fs_store;
pub mod paths;
pub mod repository;

pub use fs_store::{FileStore, StoreError, StoreResult};
pub use paths::StorePaths;
pub use repository::{
    NomineeProfile, NomineeRepository, PrincipalProfile, PrincipalRepository, StoredNominee,
    StoredPrincipal,
};
