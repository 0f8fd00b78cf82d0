use super::{error::AppResult, App, AppError};
use crate::{
    backend::schema::{GenerateEmailRequest, HistoryEntry},
    domain::{ChatLog, ChatMessage, ChatRole},
};

pub const ASSISTANT_SUGGESTIONS: [&str; 3] = [
    "Help me write a email for school PTM for x school",
    "Help me write a professional email for client cold reach to advertise my company",
    "write a professional email for my staff to thanks for the Christmas event arrangements",
];

const APOLOGY: &str = "Sorry, I could not generate a response. Please try again.";

impl App {
    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn reset_assistant(&mut self) {
        self.chat.reset();
    }

    /// Asks the backend to draft (or redraft) the email. The reply replaces
    /// the current subject and body. Blank input is ignored.
    #[tracing::instrument(name = "Ask the writing assistant", skip(self, input))]
    pub async fn ask_assistant(&mut self, input: &str) -> AppResult<Option<ChatMessage>> {
        if input.trim().is_empty() {
            return Ok(None);
        }

        self.chat.push(ChatRole::User, input);
        let request = GenerateEmailRequest {
            user_message: input.to_owned(),
            history: self.chat.messages().iter().map(HistoryEntry::from).collect(),
            subject: self.subject.clone(),
            body: self.body.clone(),
        };

        match self.backend.generate_email(&request).await {
            Ok(draft) => {
                let reply = format!("**{}**\n\n{}", draft.subject, draft.body);
                self.set_email(draft.subject, draft.body);
                Ok(Some(self.chat.push(ChatRole::Assistant, reply).clone()))
            }
            Err(e) => {
                tracing::error!(error = %e, "the assistant could not draft an email");
                self.chat.push(ChatRole::Assistant, APOLOGY);
                Err(AppError::Generation(e))
            }
        }
    }
}
