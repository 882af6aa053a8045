// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Repository layer providing typed access to the file store.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! using the FileStore for all file operations and uniqueness claims.

pub mod nominees;
pub mod principals;

pub use nominees::{NomineeProfile, NomineeRepository, StoredNominee};
pub use principals::{PrincipalProfile, PrincipalRepository, StoredPrincipal};
