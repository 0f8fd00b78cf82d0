use super::{error::AppResult, App, AppError, PreviewState};
use crate::{
    backend::schema::{OutgoingEmail, SendEmailsRequest},
    domain::SendResult,
};

/// What the review step shows before sending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignSummary {
    pub recipients: usize,
    pub personalized: bool,
    pub subject: Option<String>,
}

impl std::fmt::Display for CampaignSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let noun = if self.recipients == 1 {
            "recipient"
        } else {
            "recipients"
        };
        let email_type = if self.personalized {
            "Personalized"
        } else {
            "Single Email for All"
        };
        writeln!(f, "Recipients: {} {}", self.recipients, noun)?;
        writeln!(f, "Email Type: {}", email_type)?;
        write!(f, "Subject: {}", self.subject.as_deref().unwrap_or("Not set"))
    }
}

impl App {
    /// Sending needs recipients and a subject. Personalized campaigns also
    /// need their previews, since those are what gets sent.
    pub fn can_send(&self) -> bool {
        !self.recipients.is_empty()
            && !self.subject.is_empty()
            && (!self.personalized || self.preview.has_emails())
    }

    pub fn campaign_summary(&self) -> CampaignSummary {
        CampaignSummary {
            recipients: self.recipients.len(),
            personalized: self.personalized,
            subject: (!self.subject.is_empty()).then(|| self.subject.clone()),
        }
    }

    pub fn send_result(&self) -> Option<&SendResult> {
        self.send_result.as_ref()
    }

    /// Clears the outcome of the last send. Recipients and draft are kept.
    pub fn start_new_campaign(&mut self) {
        self.send_result = None;
    }

    #[tracing::instrument(
        name = "Send campaign",
        skip(self),
        fields(recipients = self.recipients.len(), mode = %self.mode())
    )]
    pub async fn send_campaign(&mut self) -> AppResult<SendResult> {
        if !self.can_send() {
            return Err(AppError::NothingToSend);
        }

        // what gets sent must match the draft as it is now
        let preview = self.settled_preview().await;
        let emails = self.outgoing_emails(&preview);
        if !self.can_send() || emails.is_empty() {
            return Err(AppError::NothingToSend);
        }

        let request = SendEmailsRequest {
            subject: self.subject.clone(),
            emails,
        };

        match self.backend.send_emails(&request).await {
            Ok(result) => {
                tracing::info!(
                    sent = result.sent.len(),
                    failed = result.failed.len(),
                    "campaign handed to the backend"
                );
                self.send_result = Some(result.clone());
                Ok(result)
            }
            Err(e) => {
                tracing::error!(error = %e, "campaign could not be sent");
                self.send_result = None;
                Err(AppError::Send(e))
            }
        }
    }

    /// Rendered previews when there are any. A bulk campaign without previews
    /// sends the body unchanged to everyone.
    fn outgoing_emails(&self, preview: &PreviewState) -> Vec<OutgoingEmail> {
        if !preview.emails.is_empty() {
            return preview
                .emails
                .iter()
                .map(|email| OutgoingEmail {
                    email: email.email.clone(),
                    rendered_body: email.rendered_body.clone(),
                })
                .collect();
        }

        if self.personalized {
            return Vec::new();
        }

        self.recipients
            .iter()
            .map(|recipient| OutgoingEmail {
                email: recipient.email.clone(),
                rendered_body: self.body.clone(),
            })
            .collect()
    }
}
