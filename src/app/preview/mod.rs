//! Keeps the rendered previews in step with the draft.
//!
//! Every change to the draft restarts a quiescence timer and cancels whatever
//! request is still running. Only when the timer runs out is
//! `/personalize-emails` called, and a failed call is retried once before the
//! error is shown. The newest draft always wins: results for a draft that has
//! since changed are dropped.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    time::{sleep_until, Instant},
};
use tokio_util::sync::CancellationToken;

use super::App;
use crate::{
    backend::{schema::PersonalizeRequest, BackendClient, BackendError},
    config::PreviewSettings,
    domain::PersonalizedEmail,
};

pub mod navigator;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewState {
    /// A preview for the current draft is scheduled or in flight.
    pub loading: bool,
    pub emails: Vec<PersonalizedEmail>,
    pub error: Option<String>,
}

pub struct PreviewCoordinator {
    inputs: watch::Sender<Option<PersonalizeRequest>>,
    state: Arc<watch::Sender<PreviewState>>,
}

impl PreviewCoordinator {
    pub fn spawn(backend: BackendClient, settings: &PreviewSettings) -> Self {
        let (inputs, inputs_rx) = watch::channel(None);
        let state = Arc::new(watch::channel(PreviewState::default()).0);

        tokio::spawn(run(
            backend,
            inputs_rx,
            Arc::clone(&state),
            settings.debounce(),
            settings.retry_delay(),
        ));

        Self { inputs, state }
    }

    /// Submits the current draft. Re-submitting an unchanged draft is a no-op.
    pub fn update(&self, request: PersonalizeRequest) {
        let complete = request.is_complete();
        let changed = self.inputs.send_if_modified(|current| {
            if current.as_ref() == Some(&request) {
                return false;
            }
            *current = Some(request);
            true
        });

        if changed {
            self.state.send_modify(|state| {
                state.loading = complete;
                if !complete {
                    state.emails.clear();
                    state.error = None;
                }
            });
        }
    }

    pub fn state(&self) -> PreviewState {
        self.state.borrow().clone()
    }

    pub fn has_emails(&self) -> bool {
        !self.state.borrow().emails.is_empty()
    }

    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.state.subscribe()
    }

    #[cfg(test)]
    pub(crate) fn publish(&self, emails: Vec<PersonalizedEmail>) {
        self.state.send_modify(|state| {
            state.loading = false;
            state.emails = emails;
            state.error = None;
        });
    }
}

async fn run(
    backend: BackendClient,
    mut inputs: watch::Receiver<Option<PersonalizeRequest>>,
    state: Arc<watch::Sender<PreviewState>>,
    debounce: Duration,
    retry_delay: Duration,
) {
    let mut deadline: Option<Instant> = None;
    let mut in_flight: Option<CancellationToken> = None;

    loop {
        tokio::select! {
            changed = inputs.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(token) = in_flight.take() {
                    token.cancel();
                }
                let complete = inputs
                    .borrow_and_update()
                    .as_ref()
                    .is_some_and(PersonalizeRequest::is_complete);
                deadline = complete.then(|| Instant::now() + debounce);
            }
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                let request = match inputs.borrow().clone() {
                    Some(request) if request.is_complete() => request,
                    _ => continue,
                };

                let token = CancellationToken::new();
                in_flight = Some(token.clone());
                tokio::spawn(fetch(
                    backend.clone(),
                    request,
                    inputs.clone(),
                    Arc::clone(&state),
                    token,
                    retry_delay,
                ));
            }
        }
    }

    if let Some(token) = in_flight {
        token.cancel();
    }
    tracing::debug!("preview coordinator stopped");
}

#[tracing::instrument(name = "Render previews", skip_all, fields(recipients = request.recipients.len(), mode = %request.mode))]
async fn fetch(
    backend: BackendClient,
    request: PersonalizeRequest,
    inputs: watch::Receiver<Option<PersonalizeRequest>>,
    state: Arc<watch::Sender<PreviewState>>,
    token: CancellationToken,
    retry_delay: Duration,
) {
    let outcome = tokio::select! {
        biased;
        () = token.cancelled() => {
            tracing::debug!("preview request superseded");
            return;
        }
        outcome = personalize_with_retry(&backend, &request, retry_delay) => outcome,
    };

    // The draft may have moved on while the request was running.
    state.send_if_modified(|state| {
        if token.is_cancelled() || inputs.borrow().as_ref() != Some(&request) {
            return false;
        }
        state.loading = false;
        match outcome {
            Ok(emails) => {
                state.emails = emails;
                state.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "preview failed after retrying");
                state.emails.clear();
                state.error = Some(e.to_string());
            }
        }
        true
    });
}

async fn personalize_with_retry(
    backend: &BackendClient,
    request: &PersonalizeRequest,
    retry_delay: Duration,
) -> Result<Vec<PersonalizedEmail>, BackendError> {
    match backend.personalize_emails(request).await {
        Ok(emails) => Ok(emails),
        Err(e) => {
            tracing::warn!(error = %e, "preview request failed, retrying once");
            tokio::time::sleep(retry_delay).await;
            backend.personalize_emails(request).await
        }
    }
}

impl App {
    pub fn preview(&self) -> PreviewState {
        self.preview.state()
    }

    pub fn subscribe_preview(&self) -> watch::Receiver<PreviewState> {
        self.preview.subscribe()
    }

    /// Waits until no preview is pending for the current draft, then returns it.
    pub async fn settled_preview(&self) -> PreviewState {
        let mut receiver = self.preview.subscribe();
        let settled = tokio::time::timeout(self.settle_timeout, receiver.wait_for(|s| !s.loading))
            .await
            .ok()
            .and_then(Result::ok)
            .map(|state| state.clone());

        settled.unwrap_or_else(|| {
            tracing::warn!("gave up waiting for the preview to settle");
            self.preview.state()
        })
    }

    pub fn preview_index(&self) -> usize {
        self.navigator.index()
    }

    pub fn current_preview(&self) -> Option<PersonalizedEmail> {
        let state = self.preview.state.borrow();
        self.navigator.current(&state.emails).cloned()
    }

    pub fn next_preview(&mut self) -> usize {
        let len = self.preview.state.borrow().emails.len();
        self.navigator.next(len)
    }

    pub fn previous_preview(&mut self) -> usize {
        let len = self.preview.state.borrow().emails.len();
        self.navigator.previous(len)
    }
}
