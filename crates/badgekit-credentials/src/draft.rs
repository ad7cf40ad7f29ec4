//! Issuance form state: a badge class being edited, its derived views, and
//! coalescing of rapid edits.

use std::time::Duration;
use tokio::sync::mpsc;

use badgekit_core::{CanonicalBadge, LegacyAssertion, LegacyBadgeClass};

use crate::error::CredentialError;
use crate::normalize::normalize_badge_class;
use crate::template::{create_assertion_template, create_badge_class_template};
use crate::validator::validate;

/// A badge class under edit.
///
/// Derived views (validation errors and the display preview) are recomputed
/// on every [`IssuanceDraft::edit`], never lazily.
#[derive(Debug, Clone)]
pub struct IssuanceDraft {
    badge_class: LegacyBadgeClass,
    errors: Vec<String>,
    preview: CanonicalBadge,
    revision: u64,
}

impl IssuanceDraft {
    /// Start from the placeholder badge class template.
    pub fn new() -> Self {
        Self::from_badge_class(create_badge_class_template())
    }

    /// Start from an existing badge class.
    pub fn from_badge_class(badge_class: LegacyBadgeClass) -> Self {
        let mut draft = Self {
            badge_class,
            errors: Vec::new(),
            preview: CanonicalBadge::default(),
            revision: 0,
        };
        draft.recompute();
        draft
    }

    /// Apply a mutation and recompute the derived views.
    pub fn edit(&mut self, mutate: impl FnOnce(&mut LegacyBadgeClass)) {
        mutate(&mut self.badge_class);
        self.revision += 1;
        self.recompute();
        tracing::trace!(
            revision = self.revision,
            errors = self.errors.len(),
            "draft edited"
        );
    }

    fn recompute(&mut self) {
        self.errors = validate(&self.badge_class);
        self.preview = normalize_badge_class(&self.badge_class);
    }

    pub fn badge_class(&self) -> &LegacyBadgeClass {
        &self.badge_class
    }

    /// Validation errors as of the last edit.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Display preview as of the last edit.
    pub fn preview(&self) -> &CanonicalBadge {
        &self.preview
    }

    /// Number of edits applied.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_ready(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn the draft into an assertion for `recipient_email`.
    pub fn into_assertion(self, recipient_email: &str) -> Result<LegacyAssertion, CredentialError> {
        if !self.is_ready() {
            return Err(CredentialError::NotReady(self.errors.join("; ")));
        }
        Ok(create_assertion_template(self.badge_class, recipient_email))
    }
}

impl Default for IssuanceDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Coalesces bursts of edits into one update.
///
/// Every [`EditDebouncer::push`] restarts the quiet window; once the window
/// elapses with no further push, the latest value is emitted exactly once.
/// Dropping the debouncer flushes a pending value and ends the task.
pub struct EditDebouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> EditDebouncer<T> {
    /// Spawn the debounce task on the current tokio runtime. Returns the
    /// input handle and the receiver of coalesced updates.
    pub fn spawn(quiet_window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, mut input) = mpsc::unbounded_channel::<T>();
        let (output, updates) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(first) = input.recv().await {
                let mut latest = first;
                let mut coalesced = 1usize;

                loop {
                    tokio::select! {
                        next = input.recv() => match next {
                            Some(value) => {
                                latest = value;
                                coalesced += 1;
                            }
                            None => break,
                        },
                        _ = tokio::time::sleep(quiet_window) => break,
                    }
                }

                tracing::trace!(coalesced, "emitting coalesced edit");
                if output.send(latest).is_err() {
                    return;
                }
            }
        });

        (Self { tx }, updates)
    }

    /// Record an edit. Returns `false` if the debounce task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}
