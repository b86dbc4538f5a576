//! The authoring form component: one draft, the busy flag, and the result
//! indicator, for either a blog post (course) or a marketplace item.
//!
//! A submission runs in three steps so a UI loop can render in between:
//! [`Composer::begin_submit`] locks the form and snapshots the payload,
//! [`PendingSubmission::send`] does the network work without borrowing the
//! composer, and [`Composer::finish_submit`] applies the outcome.

use std::time::Instant;

use bz_core::models::ListingKind;

use crate::draft::{Draft, DraftMsg};
use crate::error::ClientError;
use crate::feedback::{Feedback, SubmissionResult};
use crate::submit::{SubmissionClient, SubmissionPayload};
use crate::token::TokenSource;

pub type SubmitOutcome = Result<(), ClientError>;

#[derive(Debug)]
pub struct Composer {
    kind: ListingKind,
    username: String,
    category: String,
    draft: Draft,
    busy: bool,
    feedback: Feedback,
}

/// A submission that has left the form and not yet come back.
#[derive(Debug)]
pub struct PendingSubmission {
    kind: ListingKind,
    payload: SubmissionPayload,
}

impl PendingSubmission {
    pub fn payload(&self) -> &SubmissionPayload {
        &self.payload
    }

    /// Fetches a fresh token and makes exactly one attempt.
    pub async fn send(self, client: &SubmissionClient, tokens: &dyn TokenSource) -> SubmitOutcome {
        let token = tokens.fetch_token().await?;
        client.create(self.kind, &self.payload, &token).await
    }
}

impl Composer {
    pub fn new(kind: ListingKind, username: impl Into<String>) -> Self {
        Self {
            kind,
            username: username.into(),
            category: kind.default_category().to_string(),
            draft: Draft::new(),
            busy: false,
            feedback: Feedback::default(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn kind(&self) -> ListingKind {
        self.kind
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Applies an edit. The authoring pane ignores input while busy.
    pub fn edit(&mut self, msg: DraftMsg) {
        if self.busy {
            tracing::trace!(?msg, "edit ignored while submitting");
            return;
        }
        self.draft = std::mem::take(&mut self.draft).update(msg);
    }

    pub fn authoring_interactive(&self) -> bool {
        !self.busy
    }

    pub fn submit_enabled(&self) -> bool {
        !self.busy && self.draft.is_submittable()
    }

    pub fn submit_label(&self) -> &'static str {
        let success = self.feedback.result() == SubmissionResult::Success;
        match (self.kind, self.busy, success) {
            (ListingKind::Course, true, _) => "Creating...",
            (ListingKind::Course, false, true) => "Blog Created",
            (ListingKind::Course, false, false) => "Create Blog",
            (ListingKind::Item, true, _) => "Adding Item...",
            (ListingKind::Item, false, true) => "Item Added",
            (ListingKind::Item, false, false) => "Add Item",
        }
    }

    /// Advances the result indicator's timer.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.feedback.tick(now)
    }

    /// Locks the form and snapshots the payload, or returns `None` when the
    /// submit control is disabled (incomplete draft or already busy).
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        if !self.submit_enabled() {
            return None;
        }
        self.busy = true;
        Some(PendingSubmission {
            kind: self.kind,
            payload: SubmissionPayload::from_draft(&self.draft, &self.username, &self.category),
        })
    }

    /// Applies a terminal outcome and starts the result indicator's timer.
    pub fn finish_submit(&mut self, outcome: SubmitOutcome, now: Instant) {
        let result = match outcome {
            Ok(()) => {
                self.draft = Draft::new();
                SubmissionResult::Success
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = self.kind.collection(), "submission failed");
                SubmissionResult::Failure
            }
        };
        self.busy = false;
        self.feedback.settle(result, now);
    }

    /// Runs a whole submission. Returns `None` if the submit control was disabled.
    pub async fn submit(
        &mut self,
        client: &SubmissionClient,
        tokens: &dyn TokenSource,
    ) -> Option<SubmissionResult> {
        let pending = self.begin_submit()?;
        let outcome = pending.send(client, tokens).await;
        self.finish_submit(outcome, Instant::now());
        Some(self.feedback.result())
    }
}
