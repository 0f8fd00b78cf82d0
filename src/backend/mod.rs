use std::time::Duration;

use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{PersonalizedEmail, SendResult};

mod error;
pub mod schema;

pub use self::error::BackendError;
use self::schema::{
    CsvValidation, GenerateEmailRequest, GeneratedEmail, PersonalizeRequest, PersonalizeResponse,
    SendEmailsRequest,
};

/// Client for the campaign backend, which validates CSVs, writes drafts,
/// renders templates and delivers mail.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http_client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, BackendError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[tracing::instrument(name = "Validate recipient CSV", skip(self, contents), fields(bytes = contents.len()))]
    pub async fn validate_csv(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<CsvValidation, BackendError> {
        if !file_name.to_lowercase().ends_with(".csv") {
            return Err(BackendError::InvalidFile(format!(
                "{} is not a CSV file. Only CSV files are allowed.",
                file_name
            )));
        }

        let part = multipart::Part::bytes(contents)
            .file_name(file_name.to_owned())
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(self.url("/validate-csv"))
            .multipart(form)
            .send()
            .await?;

        decode(response).await
    }

    #[tracing::instrument(name = "Generate email draft", skip(self, request), fields(history = request.history.len()))]
    pub async fn generate_email(
        &self,
        request: &GenerateEmailRequest,
    ) -> Result<GeneratedEmail, BackendError> {
        let response = self
            .http_client
            .post(self.url("/generate-email"))
            .json(request)
            .send()
            .await?;

        decode(response).await
    }

    #[tracing::instrument(
        name = "Personalize emails",
        skip(self, request),
        fields(recipients = request.recipients.len(), mode = %request.mode)
    )]
    pub async fn personalize_emails(
        &self,
        request: &PersonalizeRequest,
    ) -> Result<Vec<PersonalizedEmail>, BackendError> {
        let response = self
            .http_client
            .post(self.url("/personalize-emails"))
            .json(request)
            .send()
            .await?;

        let body: PersonalizeResponse = decode(response).await?;
        Ok(body.emails)
    }

    #[tracing::instrument(name = "Send emails", skip(self, request), fields(emails = request.emails.len()))]
    pub async fn send_emails(&self, request: &SendEmailsRequest) -> Result<SendResult, BackendError> {
        let response = self
            .http_client
            .post(self.url("/send-emails"))
            .json(request)
            .send()
            .await?;

        decode(response).await
    }
}

/// Reads the body as text first so that error responses keep their message
/// even when they are not the expected shape.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let text = response.text().await?;

    let body: Value = if text.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(&text).map_err(|_| BackendError::InvalidJson(text.clone()))?
    };

    if !status.is_success() {
        let detail = error::error_detail(&body, &text, status);
        tracing::warn!(status = status.as_u16(), %detail, "backend rejected the request");
        return Err(BackendError::Status { status, detail });
    }

    Ok(serde_json::from_value(body)?)
}
