use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, ChatRole, PersonalizationMode, PersonalizedEmail, Recipient};

/// A row as returned by `/validate-csv`. Extra columns are ignored.
#[derive(Debug, Deserialize)]
pub struct RecipientRow {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: String,
}

impl From<RecipientRow> for Recipient {
    fn from(value: RecipientRow) -> Self {
        Recipient::new(value.first_name, value.last_name, value.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct CsvValidation {
    #[serde(default)]
    pub valid_rows: Vec<RecipientRow>,
    #[serde(default)]
    pub invalid_rows_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
    pub role: ChatRole,
    pub content: String,
}

impl From<&ChatMessage> for HistoryEntry {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateEmailRequest {
    pub user_message: String,
    pub history: Vec<HistoryEntry>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneratedEmail {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

/// Everything a preview depends on. Two equal requests render the same previews.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PersonalizeRequest {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<Recipient>,
    pub mode: PersonalizationMode,
}

impl PersonalizeRequest {
    /// Previews are only worth asking for once there is something to render.
    pub fn is_complete(&self) -> bool {
        !self.subject.is_empty() && !self.body.is_empty() && !self.recipients.is_empty()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PersonalizeResponse {
    #[serde(default)]
    pub emails: Vec<PersonalizedEmail>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub email: String,
    pub rendered_body: String,
}

#[derive(Debug, Serialize)]
pub struct SendEmailsRequest {
    pub subject: String,
    pub emails: Vec<OutgoingEmail>,
}
