use super::{error::AppResult, App, AppError};

impl App {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_personalized(&self) -> bool {
        self.personalized
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
        self.inputs_changed();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.inputs_changed();
    }

    /// Replaces the whole draft at once, as the assistant does.
    pub fn set_email(&mut self, subject: impl Into<String>, body: impl Into<String>) {
        self.subject = subject.into();
        self.body = body.into();
        self.inputs_changed();
    }

    pub fn set_personalized(&mut self, personalized: bool) {
        if self.personalized != personalized {
            tracing::debug!(personalized, "personalization toggled");
        }
        self.personalized = personalized;
        self.inputs_changed();
    }

    /// Appends `{{column}}` to the body.
    pub fn insert_placeholder(&mut self, column: &str) -> AppResult<()> {
        if !self.available_columns.iter().any(|c| c == column) {
            return Err(AppError::ValidationError(format!(
                "{} is not a recipient column. Available: {}",
                column,
                self.available_columns.join(", ")
            )));
        }

        let body = format!("{}{{{{{}}}}}", self.body, column);
        self.set_body(body);
        Ok(())
    }
}
