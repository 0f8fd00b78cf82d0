use std::time::Duration;

use derive_more::Display;

use crate::{
    backend::{schema::PersonalizeRequest, BackendClient, BackendError},
    config::{PreviewSettings, Settings},
    domain::{ChatLog, PersonalizationMode, Recipient, SendResult},
};

mod approval;
mod assistant;
mod compose;
pub mod error;
pub mod preview;
mod upload;

pub use self::approval::CampaignSummary;
pub use self::assistant::ASSISTANT_SUGGESTIONS;
pub use self::error::{AppError, AppResult};
pub use self::preview::{navigator::PreviewNavigator, PreviewCoordinator, PreviewState};
pub use self::upload::UploadSummary;

/// Where the user is in the wizard, derived from what has been filled in so far.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    #[display(fmt = "Step 1: Upload Recipients")]
    Upload,
    #[display(fmt = "Step 2: Compose Email")]
    Compose,
    #[display(fmt = "Step 3: Preview")]
    Preview,
    #[display(fmt = "Step 4: Review & Send")]
    Approve,
    #[display(fmt = "Campaign Sent")]
    Sent,
}

/// One campaign session: recipients, draft, assistant chat, previews and the
/// outcome of sending. Lives as long as the session; nothing is persisted.
pub struct App {
    backend: BackendClient,
    recipients: Vec<Recipient>,
    available_columns: Vec<String>,
    uploaded_file: Option<String>,
    subject: String,
    body: String,
    personalized: bool,
    chat: ChatLog,
    preview: PreviewCoordinator,
    navigator: PreviewNavigator,
    settle_timeout: Duration,
    send_result: Option<SendResult>,
}

impl App {
    /// Must be called from within a tokio runtime: the preview coordinator is
    /// spawned right away.
    pub fn build(config: &Settings) -> Result<Self, BackendError> {
        let timeout = config.backend.timeout();
        let backend = BackendClient::new(config.backend.base_url.clone(), timeout)?;
        Ok(Self::with_backend(backend, &config.preview, timeout))
    }

    pub fn with_backend(
        backend: BackendClient,
        preview: &PreviewSettings,
        request_timeout: Duration,
    ) -> Self {
        // a request plus its retry, after the debounce window
        let settle_timeout = preview.debounce() + preview.retry_delay() + request_timeout * 2;

        Self {
            preview: PreviewCoordinator::spawn(backend.clone(), preview),
            backend,
            recipients: Vec::new(),
            available_columns: Vec::new(),
            uploaded_file: None,
            subject: String::new(),
            body: String::new(),
            personalized: false,
            chat: ChatLog::new(),
            navigator: PreviewNavigator::default(),
            settle_timeout,
            send_result: None,
        }
    }

    pub fn step(&self) -> Step {
        if self.send_result.is_some() {
            Step::Sent
        } else if self.recipients.is_empty() {
            Step::Upload
        } else if self.subject.is_empty() || self.body.is_empty() {
            Step::Compose
        } else if !self.can_send() {
            Step::Preview
        } else {
            Step::Approve
        }
    }

    pub fn mode(&self) -> PersonalizationMode {
        self.personalized.into()
    }

    fn preview_request(&self) -> PersonalizeRequest {
        PersonalizeRequest {
            subject: self.subject.clone(),
            body: self.body.clone(),
            recipients: self.recipients.clone(),
            mode: self.mode(),
        }
    }

    /// Called after any change to subject, body, recipients or the
    /// personalization flag.
    fn inputs_changed(&mut self) {
        self.navigator.reset();
        self.preview.update(self.preview_request());
    }
}
