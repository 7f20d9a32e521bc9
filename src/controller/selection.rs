//! Selected subscriptions and the bulk-unsubscribe lifecycle.
//!
//! The selection is a set of ids that outlives page navigation and sort
//! changes; the owner clears it when the applied filter changes. A bulk
//! unsubscribe is all-or-nothing: the selection only changes once the server
//! has confirmed the request.
use crate::model::SubscriptionItem;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Nothing selected")]
    EmptySelection,
    #[error("An unsubscribe request is already in progress")]
    MutationInFlight,
}

/// Result of reconciling a finished unsubscribe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Server confirmed; these ids should disappear from the list.
    Removed(HashSet<String>),
    /// Server rejected; nothing was changed locally.
    Failed { error: String },
}

#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: HashSet<String>,
    /// Ids of the unsubscribe request currently awaiting the server.
    pending: Option<Vec<String>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_mutating(&self) -> bool {
        self.pending.is_some()
    }

    /// Add or remove `id`. Idempotent.
    pub fn toggle(&mut self, id: &str, selected: bool) {
        if selected {
            self.selected.insert(id.to_string());
        } else {
            self.selected.remove(id);
        }
    }

    /// Flip the selection state of `id`. Returns the new state.
    pub fn flip(&mut self, id: &str) -> bool {
        let now_selected = !self.is_selected(id);
        self.toggle(id, now_selected);
        now_selected
    }

    /// Add every visible id. Ids outside `visible` are untouched.
    pub fn select_all_visible(&mut self, visible: &[SubscriptionItem]) {
        self.selected
            .extend(visible.iter().map(|item| item.id.clone()));
    }

    /// Remove every visible id. Ids outside `visible` are untouched.
    pub fn deselect_all_visible(&mut self, visible: &[SubscriptionItem]) {
        for item in visible {
            self.selected.remove(&item.id);
        }
    }

    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            tracing::debug!(count = self.selected.len(), "Selection cleared");
        }
        self.selected.clear();
    }

    /// Start a bulk unsubscribe of the current selection.
    ///
    /// # Returns
    ///
    /// The ids to post, sorted for a stable request body.
    ///
    /// # Errors
    ///
    /// [`SelectionError`] when nothing is selected or another request is
    /// still pending. The selection is left as it was.
    pub fn begin_unsubscribe(&mut self) -> Result<Vec<String>, SelectionError> {
        if self.pending.is_some() {
            return Err(SelectionError::MutationInFlight);
        }
        if self.selected.is_empty() {
            return Err(SelectionError::EmptySelection);
        }

        let mut ids: Vec<String> = self.selected.iter().cloned().collect();
        ids.sort();
        self.pending = Some(ids.clone());
        tracing::debug!(count = ids.len(), "Unsubscribe started");
        Ok(ids)
    }

    /// Reconcile the server's answer for the pending request.
    ///
    /// On success the posted ids leave the selection; ids selected while
    /// the request was in flight are kept. On failure nothing changes.
    pub fn complete_unsubscribe(&mut self, result: Result<(), String>) -> MutationOutcome {
        let ids = self.pending.take().unwrap_or_default();

        match result {
            Ok(()) => {
                let removed: HashSet<String> = ids.into_iter().collect();
                self.selected.retain(|id| !removed.contains(id));
                tracing::info!(count = removed.len(), "Unsubscribe confirmed");
                MutationOutcome::Removed(removed)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Unsubscribe failed");
                MutationOutcome::Failed { error }
            }
        }
    }
}
