//! Request lifecycle for the subscription list.
//!
//! [`RequestController`] owns the query parameters and turns every parameter
//! change into a [`FetchTicket`]. Each ticket carries a generation number;
//! when a result comes back it is applied only if its generation is still the
//! latest one issued. Older results are reported as
//! [`FetchResolution::Cancelled`] and leave the display state untouched, so a
//! slow response can never overwrite a newer one.
//!
//! The controller performs no I/O. The caller runs the ticket (see
//! [`crate::tasks::spawn_fetch`]) and feeds the result back through
//! [`RequestController::complete`].
use crate::api::ApiError;
use crate::model::{FetchOutcome, QueryState, SortOrder, SubscriptionItem};
use std::collections::HashSet;

/// Fetch phase. Terminal outcomes are reported by [`FetchResolution`] and
/// the phase always returns to `Idle` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading { generation: u64 },
}

/// How a completed fetch was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResolution {
    /// Latest request succeeded; list and total were replaced.
    Success { count: usize, total: u64 },
    /// Latest request failed; the error is recorded.
    Failed { error: String },
    /// Result belonged to a superseded request and was dropped.
    Cancelled,
}

/// A request the caller should execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: QueryState,
    /// Post to the cache-invalidation endpoint before fetching. Stays set on
    /// every ticket after a force refresh until one of them completes.
    pub invalidate_cache: bool,
    /// Refresh token at issue time. Only changes on force refresh.
    pub refresh_token: u64,
    /// Generation of the in-flight request this ticket supersedes, if any.
    pub superseded: Option<u64>,
    /// Applied filter changed with this ticket; selection must be reset.
    pub filter_changed: bool,
}

pub struct RequestController {
    query: QueryState,
    /// Filter text being edited, not yet sent to the server.
    draft_filter: String,
    generation: u64,
    refresh_token: u64,
    /// A force refresh has not yet reached a completed request.
    pending_invalidation: bool,
    state: FetchState,
    items: Vec<SubscriptionItem>,
    total: u64,
    /// At least one fetch has succeeded.
    has_loaded: bool,
    last_error: Option<String>,
}

impl RequestController {
    pub fn new(sort_order: SortOrder) -> Self {
        Self {
            query: QueryState::new(sort_order),
            draft_filter: String::new(),
            generation: 0,
            refresh_token: 0,
            pending_invalidation: false,
            state: FetchState::Idle,
            items: Vec::new(),
            total: 0,
            has_loaded: false,
            last_error: None,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn items(&self) -> &[SubscriptionItem] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading { .. })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn refresh_token(&self) -> u64 {
        self.refresh_token
    }

    pub fn invalidation_pending(&self) -> bool {
        self.pending_invalidation
    }

    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ------------------------------------------------------------------------
    // Filter
    // ------------------------------------------------------------------------

    pub fn draft_filter(&self) -> &str {
        &self.draft_filter
    }

    pub fn set_draft_filter(&mut self, draft: impl Into<String>) {
        self.draft_filter = draft.into();
    }

    pub fn push_draft_char(&mut self, c: char) {
        self.draft_filter.push(c);
    }

    pub fn pop_draft_char(&mut self) {
        self.draft_filter.pop();
    }

    /// Applying only makes sense when the trimmed draft differs from what is applied.
    pub fn can_apply_filter(&self) -> bool {
        self.draft_filter.trim() != self.query.applied_filter.trim()
    }

    pub fn can_clear_filter(&self) -> bool {
        !self.draft_filter.is_empty() || !self.query.applied_filter.is_empty()
    }

    /// Apply the trimmed draft filter and restart from page 1.
    pub fn apply_filter(&mut self) -> Option<FetchTicket> {
        if !self.can_apply_filter() {
            return None;
        }
        self.query.applied_filter = self.draft_filter.trim().to_string();
        self.query.page = 1;
        tracing::debug!(filter = %self.query.applied_filter, "Filter applied");
        Some(self.issue(true))
    }

    /// Drop both draft and applied filter and restart from page 1.
    pub fn clear_filter(&mut self) -> Option<FetchTicket> {
        if !self.can_clear_filter() {
            return None;
        }
        self.draft_filter.clear();
        self.query.applied_filter.clear();
        self.query.page = 1;
        tracing::debug!("Filter cleared");
        Some(self.issue(true))
    }

    // ------------------------------------------------------------------------
    // Pagination and sort
    // ------------------------------------------------------------------------

    pub fn can_go_prev(&self) -> bool {
        self.query.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        u64::from(self.query.page) * u64::from(self.query.items_per_page) < self.total
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.can_go_next() {
            return None;
        }
        self.query.page = self.query.page.saturating_add(1);
        Some(self.issue(false))
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        if !self.can_go_prev() {
            return None;
        }
        self.query.page -= 1;
        Some(self.issue(false))
    }

    /// Flip the sort order. Page and filter are kept.
    pub fn toggle_sort(&mut self) -> FetchTicket {
        self.query.sort_order = self.query.sort_order.toggled();
        tracing::debug!(sort = %self.query.sort_order, "Sort order toggled");
        self.issue(false)
    }

    // ------------------------------------------------------------------------
    // Reload
    // ------------------------------------------------------------------------

    /// Re-issue the current query unchanged.
    pub fn reload(&mut self) -> FetchTicket {
        self.issue(false)
    }

    /// Invalidate the backend cache and re-issue the current query.
    ///
    /// Bumps the refresh token so the refetch happens even though no query
    /// parameter changed. The invalidation carries over to any ticket that
    /// supersedes this one, so a page or sort change right after a refresh
    /// still reaches the server with a fresh cache.
    pub fn force_refresh(&mut self) -> FetchTicket {
        self.refresh_token = self.refresh_token.wrapping_add(1);
        self.pending_invalidation = true;
        tracing::debug!(refresh_token = self.refresh_token, "Force refresh requested");
        self.issue(false)
    }

    fn issue(&mut self, filter_changed: bool) -> FetchTicket {
        let superseded = match self.state {
            FetchState::Loading { generation } => Some(generation),
            FetchState::Idle => None,
        };

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        self.state = FetchState::Loading { generation };

        if let Some(old) = superseded {
            tracing::debug!(old, new = generation, "Superseding in-flight fetch");
        }

        FetchTicket {
            generation,
            query: self.query.clone(),
            invalidate_cache: self.pending_invalidation,
            refresh_token: self.refresh_token,
            superseded,
            filter_changed,
        }
    }

    // ------------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------------

    /// Apply the result for `generation` if it is still the latest request.
    ///
    /// On failure the previous list is kept; it is only empty if nothing has
    /// ever loaded. Completing the latest request also settles any pending
    /// cache invalidation, since its ticket carried the flag.
    ///
    /// # Arguments
    ///
    /// * `generation` - Generation of the [`FetchTicket`] that produced `result`
    /// * `result` - Normalized page or the error from the API call
    ///
    /// # Returns
    ///
    /// [`FetchResolution::Cancelled`] when `generation` is not the request in
    /// flight, otherwise `Success` or `Failed` describing what was applied.
    pub fn complete(
        &mut self,
        generation: u64,
        result: Result<FetchOutcome, ApiError>,
    ) -> FetchResolution {
        if self.state != (FetchState::Loading { generation }) {
            tracing::debug!(
                expected = self.generation,
                got = generation,
                "Ignoring stale fetch result (generation mismatch)"
            );
            return FetchResolution::Cancelled;
        }

        self.state = FetchState::Idle;
        self.pending_invalidation = false;

        match result {
            Ok(outcome) => {
                let count = outcome.items.len();
                self.items = outcome.items;
                self.total = outcome.total;
                self.has_loaded = true;
                self.last_error = None;
                tracing::debug!(generation, count, total = self.total, "Fetch applied");
                FetchResolution::Success {
                    count,
                    total: self.total,
                }
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Fetch failed");
                let error = e.to_string();
                self.last_error = Some(error.clone());
                FetchResolution::Failed { error }
            }
        }
    }

    /// The in-flight request was dropped without a result (task aborted or panicked).
    pub fn abandon(&mut self, generation: u64) -> FetchResolution {
        if self.state == (FetchState::Loading { generation }) {
            self.state = FetchState::Idle;
        }
        FetchResolution::Cancelled
    }

    /// Remove items confirmed deleted by the server.
    ///
    /// The total is decreased by the number of removed items so the
    /// "showing X of Y" summary stays consistent until the next fetch.
    pub fn remove_items(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !ids.contains(&item.id));
        let removed = before - self.items.len();
        self.total = self.total.saturating_sub(removed as u64);
        removed
    }

    pub fn visible_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.id.as_str())
    }

    /// Number of pages for the current total, at least 1.
    pub fn page_count(&self) -> u64 {
        let per_page = u64::from(self.query.items_per_page.max(1));
        self.total.div_ceil(per_page).max(1)
    }

    /// "Showing X of Y" numbers.
    pub fn showing(&self) -> (usize, u64) {
        (self.items.len(), self.total)
    }
}

impl Default for RequestController {
    fn default() -> Self {
        Self::new(SortOrder::default())
    }
}
