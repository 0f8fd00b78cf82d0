use std::path::Path;

use anyhow::Context;

use super::{error::AppResult, App, AppError};
use crate::domain::Recipient;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadSummary {
    pub file_name: String,
    pub recipients: usize,
    pub rejected_rows: usize,
    /// Accepted rows whose address fails local validation. They are kept.
    pub unverified_addresses: usize,
}

impl App {
    pub async fn upload_csv(&mut self, path: impl AsRef<Path>) -> AppResult<UploadSummary> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_owned();

        self.upload_csv_bytes(&file_name, contents).await
    }

    /// Hands the file to the backend for validation and replaces the recipient
    /// list with the rows it accepted. On failure the current list is kept.
    #[tracing::instrument(name = "Upload recipients", skip(self, contents))]
    pub async fn upload_csv_bytes(
        &mut self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> AppResult<UploadSummary> {
        let validation = self
            .backend
            .validate_csv(file_name, contents)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "recipient upload failed");
                AppError::Upload(e)
            })?;

        let recipients: Vec<Recipient> = validation
            .valid_rows
            .into_iter()
            .map(Recipient::from)
            .collect();

        let unverified_addresses = recipients
            .iter()
            .filter(|recipient| !recipient.has_verified_email())
            .inspect(|recipient| {
                tracing::warn!(
                    email = %recipient.email,
                    "Keeping a recipient whose address does not pass local validation."
                )
            })
            .count();

        tracing::info!(
            recipients = recipients.len(),
            rejected = validation.invalid_rows_count,
            unverified = unverified_addresses,
            "recipients loaded"
        );

        self.recipients = recipients;
        self.available_columns = Recipient::COLUMNS
            .iter()
            .filter(|column| **column != "email")
            .map(|column| column.to_string())
            .collect();
        self.uploaded_file = Some(file_name.to_owned());
        self.inputs_changed();

        Ok(UploadSummary {
            file_name: file_name.to_owned(),
            recipients: self.recipients.len(),
            rejected_rows: validation.invalid_rows_count,
            unverified_addresses,
        })
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    /// Header and rows of the recipient table.
    pub fn recipient_table(&self) -> (&'static [&'static str], Vec<[&str; 3]>) {
        (
            &Recipient::COLUMNS,
            self.recipients.iter().map(Recipient::cells).collect(),
        )
    }

    pub fn uploaded_file(&self) -> Option<&str> {
        self.uploaded_file.as_deref()
    }

    /// Columns that can be used as `{{placeholders}}`.
    pub fn available_columns(&self) -> &[String] {
        &self.available_columns
    }
}
