//! Feedback form state around an opaque "send message" service.
//!
//! The transport (mail relay, HTTP endpoint) belongs to the host and sits
//! behind [`FeedbackService`]. The form only tracks the draft and the
//! pending/sent/failed state the UI shows around the call.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedbackError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("a message is already being sent")]
    AlreadyPending,
    #[error("feedback service failed: {0}")]
    Service(String),
}

/// Payload handed to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackMessage {
    pub message: String,
}

pub trait FeedbackService {
    fn send(&mut self, message: &FeedbackMessage) -> Result<(), FeedbackError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Pending,
    Sent,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackForm {
    draft: String,
    status: SubmitStatus,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmitStatus::Pending
    }

    /// Edit the draft. Editing after a settled submission returns to `Idle`.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        if matches!(self.status, SubmitStatus::Sent | SubmitStatus::Failed(_)) {
            self.status = SubmitStatus::Idle;
        }
    }

    /// Validate the draft and move to `Pending`, returning the payload to send.
    pub fn begin_submit(&mut self) -> Result<FeedbackMessage, FeedbackError> {
        if self.is_pending() {
            return Err(FeedbackError::AlreadyPending);
        }
        let message = self.draft.trim();
        if message.is_empty() {
            return Err(FeedbackError::EmptyMessage);
        }
        let payload = FeedbackMessage {
            message: message.to_string(),
        };
        self.status = SubmitStatus::Pending;
        Ok(payload)
    }

    /// Settle a pending submission. Success clears the draft; failure keeps
    /// it so the user can retry.
    pub fn finish(&mut self, result: Result<(), FeedbackError>) {
        if !self.is_pending() {
            tracing::debug!("feedback result arrived with nothing pending; ignored");
            return;
        }
        match result {
            Ok(()) => {
                self.draft.clear();
                self.status = SubmitStatus::Sent;
            }
            Err(err) => {
                tracing::warn!(error = %err, "feedback submission failed");
                self.status = SubmitStatus::Failed(err.to_string());
            }
        }
    }

    /// Submit through a synchronous service.
    pub fn submit(&mut self, service: &mut dyn FeedbackService) -> Result<(), FeedbackError> {
        let payload = self.begin_submit()?;
        let result = service.send(&payload);
        self.finish(result.clone());
        result
    }
}
