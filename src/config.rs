// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for account and document storage | `data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HMAC secret for session token signing | Required for production |
//! | `SMTP_HOST` | SMTP relay host for document alerts | `smtp.gmail.com` |
//! | `SMTP_PORT` | SMTP relay port | `587` |
//! | `SMTP_USER` | SMTP username (also the From address) | Unset disables SMTP |
//! | `SMTP_PASS` | SMTP password or app password | Unset disables SMTP |
//! | `ALERT_EMAIL` | Recipient for document upload alerts | `benefits-review@example.org` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the data directory path.
///
/// All principal and nominee records, uniqueness claims, and uploaded
/// documents are stored under this directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the session token signing secret.
///
/// Sessions are signed with HS256 over this secret. The development
/// fallback is predictable and must never be used in production.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Development fallback for `JWT_SECRET`.
pub const DEV_JWT_SECRET: &str = "your-secret-key";

/// Environment variable name for the SMTP relay host.
pub const SMTP_HOST_ENV: &str = "SMTP_HOST";

/// Default SMTP relay host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Environment variable name for the SMTP relay port.
pub const SMTP_PORT_ENV: &str = "SMTP_PORT";

/// Default SMTP relay port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Environment variable name for the SMTP username.
///
/// Also used as the From address on outgoing alerts. When unset, SMTP
/// dispatch is disabled and alerts are only logged.
pub const SMTP_USER_ENV: &str = "SMTP_USER";

/// Environment variable name for the SMTP password.
pub const SMTP_PASS_ENV: &str = "SMTP_PASS";

/// Environment variable name for the document alert recipient.
pub const ALERT_EMAIL_ENV: &str = "ALERT_EMAIL";

/// Default recipient for document upload alerts.
pub const DEFAULT_ALERT_EMAIL: &str = "benefits-review@example.org";
