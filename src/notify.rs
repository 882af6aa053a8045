// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Benefits Portal Contributors

//! Document upload alerting.
//!
//! When a nominee uploads a death certificate or medical document, a
//! fixed-recipient alert email is composed with the nominee identity, the
//! linked principal identity, the document metadata, a follow-up checklist
//! that differs by document type, and the uploaded file attached.
//!
//! Dispatch is best-effort and fire-and-forget with respect to the upload
//! response: the handler spawns [`dispatch_upload_alert`] and answers the
//! client without awaiting it. Failures are logged at `warn` and swallowed.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::{
    message::{header::ContentType, Attachment, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::{
    ALERT_EMAIL_ENV, DEFAULT_ALERT_EMAIL, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, SMTP_HOST_ENV,
    SMTP_PASS_ENV, SMTP_PORT_ENV, SMTP_USER_ENV,
};
use crate::models::DocumentType;

/// Error type for alert dispatch.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("failed to read attachment: {0}")]
    Attachment(#[from] std::io::Error),
}

/// Everything the alert email needs about one upload event.
#[derive(Debug, Clone)]
pub struct UploadAlert {
    pub nominee_name: String,
    pub nominee_email: String,
    pub relation: String,
    pub linked_user_name: String,
    pub linked_user_aadhar: String,
    pub doc_type: DocumentType,
    pub file_name: String,
    pub file_path: PathBuf,
    pub file_size: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Outbound mail seam.
///
/// The SMTP implementation is swapped for a recording stub in tests and a
/// log-only fallback when SMTP is not configured.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_upload_alert(&self, alert: &UploadAlert) -> Result<(), MailError>;
}

/// Subject line for an upload alert.
fn subject(alert: &UploadAlert) -> String {
    format!("{} Uploaded - {}", alert.doc_type, alert.linked_user_name)
}

/// Follow-up checklist, different per document type.
fn next_steps(doc_type: DocumentType) -> &'static [&'static str] {
    match doc_type {
        DocumentType::MedicalDocument => &[
            "Review the uploaded medical document",
            "Verify the authenticity of the document",
            "Update the beneficiary's medical status in the system",
            "Contact the nominee if additional information is required",
            "Process any necessary benefit adjustments",
        ],
        DocumentType::DeathCertificate => &[
            "Review the uploaded death certificate",
            "Verify the authenticity and validity of the certificate",
            "Update the beneficiary's status to deceased in the system",
            "Transfer pension benefits to the nominee",
            "Contact the nominee for any additional documentation",
            "Process the benefit transfer as per government guidelines",
        ],
    }
}

/// HTML body for an upload alert.
fn body_html(alert: &UploadAlert) -> String {
    let mut rows = String::new();
    for (label, value) in [
        ("Nominee Name", alert.nominee_name.as_str()),
        ("Nominee Email", alert.nominee_email.as_str()),
        ("Linked Beneficiary", alert.linked_user_name.as_str()),
        ("Beneficiary Aadhar", alert.linked_user_aadhar.as_str()),
        ("Document Type", alert.doc_type.label()),
        ("File Name", alert.file_name.as_str()),
        ("Relation", alert.relation.as_str()),
    ] {
        rows.push_str(&format!(
            "<tr><td><strong>{label}:</strong></td><td>{value}</td></tr>\n"
        ));
    }
    rows.push_str(&format!(
        "<tr><td><strong>File Size:</strong></td><td>{:.2} MB</td></tr>\n",
        alert.file_size as f64 / 1024.0 / 1024.0
    ));
    rows.push_str(&format!(
        "<tr><td><strong>Upload Date:</strong></td><td>{}</td></tr>\n",
        alert.uploaded_at.to_rfc3339()
    ));

    let mut steps = String::new();
    for step in next_steps(alert.doc_type) {
        steps.push_str(&format!("<li>{step}</li>\n"));
    }

    format!(
        "<h1>{} Upload Alert</h1>\n\
         <h2>Document Upload Details</h2>\n\
         <table>\n{rows}</table>\n\
         <p>A {} has been uploaded for <strong>{}</strong> by their nominee \
         <strong>{}</strong>. Please ensure timely review and processing.</p>\n\
         <h3>Next Steps</h3>\n\
         <ul>\n{steps}</ul>\n",
        alert.doc_type,
        alert.doc_type.label().to_lowercase(),
        alert.linked_user_name,
        alert.nominee_name,
    )
}

/// MIME type of the attachment, from the stored file's extension.
fn attachment_content_type(path: &std::path::Path) -> ContentType {
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    };
    ContentType::parse(mime).expect("static MIME types parse")
}

/// SMTP-backed mailer (STARTTLS relay).
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    recipient: String,
}

impl SmtpMailer {
    /// Build from `SMTP_*` / `ALERT_EMAIL` environment variables.
    ///
    /// Returns `None` when `SMTP_USER` or `SMTP_PASS` is unset, in which
    /// case the caller should fall back to [`LogMailer`].
    pub fn from_env() -> Result<Option<Self>, MailError> {
        let (Ok(user), Ok(pass)) = (std::env::var(SMTP_USER_ENV), std::env::var(SMTP_PASS_ENV))
        else {
            return Ok(None);
        };

        let host =
            std::env::var(SMTP_HOST_ENV).unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());
        let port = std::env::var(SMTP_PORT_ENV)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);
        let recipient =
            std::env::var(ALERT_EMAIL_ENV).unwrap_or_else(|_| DEFAULT_ALERT_EMAIL.to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)?
            .port(port)
            .credentials(Credentials::new(user.clone(), pass))
            .build();

        Ok(Some(Self {
            transport,
            from: user,
            recipient,
        }))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_upload_alert(&self, alert: &UploadAlert) -> Result<(), MailError> {
        let file_bytes = tokio::fs::read(&alert.file_path).await?;
        let attachment = Attachment::new(alert.file_name.clone()).body(
            file_bytes,
            attachment_content_type(&alert.file_path),
        );

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(self.recipient.parse()?)
            .subject(subject(alert))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(body_html(alert)))
                    .singlepart(attachment),
            )?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Log-only mailer used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_upload_alert(&self, alert: &UploadAlert) -> Result<(), MailError> {
        tracing::info!(
            doc_type = alert.doc_type.label(),
            nominee = %alert.nominee_email,
            file = %alert.file_name,
            "SMTP not configured, logging document alert instead"
        );
        Ok(())
    }
}

/// Dispatch an upload alert, observing the outcome only for logging.
///
/// Spawned by the upload handler; must never influence the HTTP response.
pub async fn dispatch_upload_alert(mailer: Arc<dyn Mailer>, alert: UploadAlert) {
    match mailer.send_upload_alert(&alert).await {
        Ok(()) => {
            tracing::info!(
                doc_type = alert.doc_type.label(),
                nominee = %alert.nominee_email,
                "document alert dispatched"
            );
        }
        Err(e) => {
            tracing::warn!(
                doc_type = alert.doc_type.label(),
                nominee = %alert.nominee_email,
                "failed to dispatch document alert: {e}"
            );
        }
    }
}

#[cfg(test)]
pub mod testing {
    //! Recording mailer stub shared by tests across the crate.

    use std::sync::Mutex;

    use super::*;

    /// Records every alert it is asked to send; optionally fails.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<UploadAlert>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn call_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_upload_alert(&self, alert: &UploadAlert) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(alert.clone());
            if self.fail {
                return Err(MailError::Attachment(std::io::Error::other(
                    "stub transport failure",
                )));
            }
            Ok(())
        }
    }
}
