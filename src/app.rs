use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::controller::{
    FetchResolution, FetchTicket, MutationOutcome, RequestController, SelectionManager,
};
use crate::keybindings::{Action, KeybindingRegistry};
use crate::model::{FetchOutcome, SubscriptionItem};
use crate::tasks;
use crate::util::validate_url_for_open;
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Status messages disappear after this many seconds.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Events
// ============================================================================

/// Results delivered from background tasks to the event loop.
pub enum AppEvent {
    /// A fetch finished. `generation` identifies the ticket it ran.
    SubscriptionsLoaded {
        generation: u64,
        result: Result<FetchOutcome, ApiError>,
    },
    /// The cache-invalidation POST of a force refresh failed. The fetch
    /// itself still runs.
    CacheRefreshFailed { error: String },
    /// A fetch task died without a result.
    FetchAbandoned { generation: u64 },
    /// The bulk unsubscribe request finished.
    UnsubscribeCompleted { result: Result<(), String> },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked ("fetch", "unsubscribe")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

impl AppEvent {
    /// Short name for log lines.
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::SubscriptionsLoaded { .. } => "SubscriptionsLoaded",
            AppEvent::CacheRefreshFailed { .. } => "CacheRefreshFailed",
            AppEvent::FetchAbandoned { .. } => "FetchAbandoned",
            AppEvent::UnsubscribeCompleted { .. } => "UnsubscribeCompleted",
            AppEvent::TaskPanicked { .. } => "TaskPanicked",
        }
    }
}

/// Destructive actions waiting for a y/n answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Unsubscribe { count: usize },
}

// ============================================================================
// App State
// ============================================================================

pub struct App {
    pub client: Arc<ApiClient>,
    pub requests: RequestController,
    pub selection: SelectionManager,
    pub keybindings: KeybindingRegistry,

    pub refetch_after_unsubscribe: bool,
    pub confirm_unsubscribe: bool,

    /// Index of the highlighted row in the current page.
    pub cursor: usize,
    /// Typing into the filter box.
    pub filter_editing: bool,

    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub pending_confirm: Option<ConfirmAction>,
    /// Blocking error shown after a failed unsubscribe; must be dismissed.
    pub error_dialog: Option<String>,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Wall-clock time of the last successful fetch.
    pub last_synced: Option<DateTime<Local>>,
    pub spinner_frame: usize,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    fetch_handle: Option<JoinHandle<()>>,
    unsubscribe_handle: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(config: &Config, client: ApiClient) -> Self {
        let mut keybindings = KeybindingRegistry::new();
        let warnings = keybindings.apply_overrides(&config.keybindings);
        for warning in &warnings {
            tracing::warn!(warning = %warning, "Keybinding override ignored");
        }

        let mut app = Self {
            client: Arc::new(client),
            requests: RequestController::new(config.default_sort),
            selection: SelectionManager::new(),
            keybindings,
            refetch_after_unsubscribe: config.refetch_after_unsubscribe,
            confirm_unsubscribe: config.confirm_unsubscribe,
            cursor: 0,
            filter_editing: false,
            show_help: false,
            help_scroll_offset: 0,
            pending_confirm: None,
            error_dialog: None,
            status_message: None,
            last_synced: None,
            spinner_frame: 0,
            needs_redraw: true,
            fetch_handle: None,
            unsubscribe_handle: None,
        };

        if !warnings.is_empty() {
            app.set_status(format!(
                "{} keybinding override(s) ignored, see log",
                warnings.len()
            ));
        }
        app
    }

    // ------------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------------

    pub fn highlighted(&self) -> Option<&SubscriptionItem> {
        self.requests.items().get(self.cursor)
    }

    pub fn nav_down(&mut self) {
        let len = self.requests.items().len();
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn nav_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Keep the cursor inside the current list after it changed size.
    pub fn clamp_cursor(&mut self) {
        let len = self.requests.items().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------------

    /// Run a ticket, aborting the task of the request it replaces.
    fn dispatch(&mut self, ticket: FetchTicket, tx: &mpsc::Sender<AppEvent>) {
        if ticket.filter_changed {
            self.selection.clear();
            self.cursor = 0;
        }
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
        self.fetch_handle = Some(tasks::spawn_fetch(
            Arc::clone(&self.client),
            ticket,
            tx.clone(),
        ));
    }

    /// Initial load.
    pub fn start(&mut self, tx: &mpsc::Sender<AppEvent>) {
        tracing::info!(base_url = %self.client.base_url(), "Loading subscriptions");
        self.reload(tx);
    }

    pub fn reload(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let ticket = self.requests.reload();
        self.dispatch(ticket, tx);
    }

    pub fn force_refresh(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let ticket = self.requests.force_refresh();
        self.set_status("Refreshing from server...");
        self.dispatch(ticket, tx);
    }

    pub fn next_page(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if let Some(ticket) = self.requests.next_page() {
            self.cursor = 0;
            self.dispatch(ticket, tx);
        }
    }

    pub fn prev_page(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if let Some(ticket) = self.requests.prev_page() {
            self.cursor = 0;
            self.dispatch(ticket, tx);
        }
    }

    pub fn toggle_sort(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let ticket = self.requests.toggle_sort();
        self.set_status(format!(
            "Sorted by {}",
            self.requests.query().sort_order.label()
        ));
        self.dispatch(ticket, tx);
    }

    // ------------------------------------------------------------------------
    // Filter
    // ------------------------------------------------------------------------

    pub fn begin_filter_edit(&mut self) {
        let applied = self.requests.query().applied_filter.clone();
        self.requests.set_draft_filter(applied);
        self.filter_editing = true;
    }

    /// Leave the filter box, discarding the draft.
    pub fn cancel_filter_edit(&mut self) {
        let applied = self.requests.query().applied_filter.clone();
        self.requests.set_draft_filter(applied);
        self.filter_editing = false;
    }

    pub fn apply_filter(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.filter_editing = false;
        if let Some(ticket) = self.requests.apply_filter() {
            self.dispatch(ticket, tx);
        }
    }

    pub fn clear_filter(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if let Some(ticket) = self.requests.clear_filter() {
            self.set_status("Filter cleared");
            self.dispatch(ticket, tx);
        }
    }

    /// Apply a finished fetch. Stale generations are dropped by the controller.
    pub fn on_fetch_completed(
        &mut self,
        generation: u64,
        result: Result<FetchOutcome, ApiError>,
    ) -> FetchResolution {
        let unauthorized = matches!(&result, Err(e) if e.is_unauthorized());
        let resolution = self.requests.complete(generation, result);

        match &resolution {
            FetchResolution::Success { count, total } => {
                self.last_synced = Some(Local::now());
                self.clamp_cursor();
                tracing::info!(count, total, "Subscriptions loaded");
            }
            FetchResolution::Failed { error } => {
                if unauthorized {
                    let hint = self
                        .keybindings
                        .key_for(Action::Login)
                        .unwrap_or_else(|| "L".to_string());
                    self.set_status(format!("Not signed in, press {} to log in", hint));
                } else {
                    self.set_status(format!("Failed to load subscriptions: {}", error));
                }
            }
            FetchResolution::Cancelled => {}
        }
        resolution
    }

    pub fn on_fetch_abandoned(&mut self, generation: u64) {
        self.requests.abandon(generation);
    }

    // ------------------------------------------------------------------------
    // Selection and unsubscribe
    // ------------------------------------------------------------------------

    pub fn toggle_highlighted(&mut self) {
        if let Some(id) = self.highlighted().map(|item| item.id.clone()) {
            self.selection.flip(&id);
        }
    }

    pub fn select_all_visible(&mut self) {
        self.selection.select_all_visible(self.requests.items());
    }

    pub fn deselect_all_visible(&mut self) {
        self.selection.deselect_all_visible(self.requests.items());
    }

    /// Ask to unsubscribe from the selection, via the confirm dialog if enabled.
    pub fn request_unsubscribe(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.selection.is_mutating() {
            self.set_status("An unsubscribe request is already in progress");
            return;
        }
        if self.selection.is_empty() {
            self.set_status("Nothing selected");
            return;
        }

        if self.confirm_unsubscribe {
            self.pending_confirm = Some(ConfirmAction::Unsubscribe {
                count: self.selection.len(),
            });
        } else {
            self.start_unsubscribe(tx);
        }
    }

    /// The user answered yes in the confirm dialog.
    pub fn confirm_pending(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if let Some(ConfirmAction::Unsubscribe { .. }) = self.pending_confirm.take() {
            self.start_unsubscribe(tx);
        }
    }

    pub fn cancel_pending(&mut self) {
        if self.pending_confirm.take().is_some() {
            self.set_status("Cancelled");
        }
    }

    fn start_unsubscribe(&mut self, tx: &mpsc::Sender<AppEvent>) {
        match self.selection.begin_unsubscribe() {
            Ok(ids) => {
                self.set_status(format!("Unsubscribing from {}...", ids.len()));
                self.unsubscribe_handle = Some(tasks::spawn_unsubscribe(
                    Arc::clone(&self.client),
                    ids,
                    tx.clone(),
                ));
            }
            Err(e) => self.set_status(e.to_string()),
        }
    }

    /// Reconcile the server's answer to the pending unsubscribe.
    pub fn on_unsubscribe_completed(
        &mut self,
        result: Result<(), String>,
        tx: &mpsc::Sender<AppEvent>,
    ) -> MutationOutcome {
        self.unsubscribe_handle = None;
        let outcome = self.selection.complete_unsubscribe(result);

        match &outcome {
            MutationOutcome::Removed(ids) => {
                let removed = self.requests.remove_items(ids);
                self.clamp_cursor();
                self.set_status(format!("Unsubscribed from {}", ids.len()));
                tracing::debug!(requested = ids.len(), removed, "Removed unsubscribed items");
                // A fetch issued before the delete would bring the removed
                // rows back, so it is superseded even without auto-refetch.
                if self.refetch_after_unsubscribe || self.requests.is_loading() {
                    self.reload(tx);
                }
            }
            MutationOutcome::Failed { error } => {
                self.error_dialog = Some(format!("Unsubscribe failed: {}", error));
            }
        }
        outcome
    }

    pub fn dismiss_error(&mut self) {
        self.error_dialog = None;
    }

    // ------------------------------------------------------------------------
    // Browser
    // ------------------------------------------------------------------------

    pub fn open_highlighted_channel(&mut self) {
        let Some(item) = self.highlighted() else {
            return;
        };
        if item.channel_url.is_empty() {
            self.set_status("No channel link for this subscription");
            return;
        }
        let name = item.display_name().to_string();
        let url = item.channel_url.clone();
        self.open_in_browser(&url, format!("Opening {}...", name));
    }

    pub fn login(&mut self) {
        let url = self.client.auth_start_url();
        self.open_in_browser(url.as_str(), "Opening login page in browser...".into());
    }

    fn open_in_browser(&mut self, url: &str, opening: String) {
        // Validate before open::that() so a bad payload cannot launch other handlers
        match validate_url_for_open(url) {
            Err(e) => self.set_status(e.to_string()),
            Ok(url) => match open::that(url.as_str()) {
                Ok(()) => self.set_status(opening),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to open browser");
                    self.set_status(format!("Failed to open browser: {}", e));
                }
            },
        }
    }

    /// Abort outstanding tasks on exit.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
        if let Some(handle) = self.unsubscribe_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SortOrder;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::time;

    fn test_app() -> App {
        test_app_with(&Config::default())
    }

    fn test_app_with(config: &Config) -> App {
        // Nothing listens here; tests that spawn tasks only look at local state
        let client = ApiClient::new("http://127.0.0.1:9", None, Duration::from_secs(1)).unwrap();
        App::new(config, client)
    }

    fn item(id: &str) -> SubscriptionItem {
        SubscriptionItem {
            id: id.to_string(),
            title: format!("Title {}", id),
            channel_title: format!("Channel {}", id),
            thumbnail_url: String::new(),
            channel_id: String::new(),
            channel_url: String::new(),
            total_item_count: Some(3),
        }
    }

    fn outcome(ids: &[&str], total: u64) -> FetchOutcome {
        FetchOutcome {
            items: ids.iter().map(|id| item(id)).collect(),
            total,
        }
    }

    fn loaded_app(ids: &[&str], total: u64) -> (App, mpsc::Receiver<AppEvent>, mpsc::Sender<AppEvent>) {
        let mut app = test_app();
        let (tx, rx) = mpsc::channel(16);
        app.start(&tx);
        let generation = app.requests.generation();
        app.on_fetch_completed(generation, Ok(outcome(ids, total)));
        (app, rx, tx)
    }

    #[tokio::test]
    async fn test_new_uses_config() {
        let config = Config {
            default_sort: SortOrder::Asc,
            confirm_unsubscribe: false,
            ..Config::default()
        };
        let app = test_app_with(&config);
        assert_eq!(app.requests.query().sort_order, SortOrder::Asc);
        assert!(!app.confirm_unsubscribe);
        assert!(app.needs_redraw);
    }

    #[tokio::test]
    async fn test_bad_keybinding_override_sets_status() {
        let mut overrides = HashMap::new();
        overrides.insert("no_such_action".to_string(), "x".to_string());
        let config = Config {
            keybindings: overrides,
            ..Config::default()
        };
        let app = test_app_with(&config);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("1 keybinding override"));
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_cursor_navigation_is_bounded() {
        let (mut app, _rx, _tx) = loaded_app(&["a", "b"], 2);
        app.nav_up();
        assert_eq!(app.cursor, 0);
        app.nav_down();
        app.nav_down();
        assert_eq!(app.cursor, 1);
        assert_eq!(app.highlighted().map(|i| i.id.as_str()), Some("b"));
    }

    #[tokio::test]
    async fn test_success_records_sync_time() {
        let (app, _rx, _tx) = loaded_app(&["a"], 1);
        assert!(app.last_synced.is_some());
        assert!(!app.requests.is_loading());
    }

    #[tokio::test]
    async fn test_unauthorized_shows_login_hint() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(4);
        app.start(&tx);
        let generation = app.requests.generation();
        app.on_fetch_completed(generation, Err(ApiError::HttpStatus(401)));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg.as_ref(), "Not signed in, press L to log in");
    }

    #[tokio::test]
    async fn test_apply_filter_clears_selection_and_resets_page() {
        let (mut app, _rx, tx) = loaded_app(&["a", "b"], 100);
        app.toggle_highlighted();
        app.next_page(&tx);
        let generation = app.requests.generation();
        app.on_fetch_completed(generation, Ok(outcome(&["c", "d"], 100)));
        assert_eq!(app.requests.query().page, 2);
        assert_eq!(app.selection.len(), 1);

        app.begin_filter_edit();
        app.requests.set_draft_filter("music");
        app.apply_filter(&tx);

        assert!(!app.filter_editing);
        assert!(app.selection.is_empty());
        assert_eq!(app.requests.query().page, 1);
        assert_eq!(app.requests.query().applied_filter, "music");
        assert!(app.requests.is_loading());
    }

    #[tokio::test]
    async fn test_page_change_keeps_selection() {
        let (mut app, _rx, tx) = loaded_app(&["a", "b"], 60);
        app.select_all_visible();
        app.next_page(&tx);
        assert_eq!(app.selection.len(), 2);
        app.toggle_sort(&tx);
        assert_eq!(app.selection.len(), 2);
    }

    #[tokio::test]
    async fn test_cancel_filter_edit_restores_draft() {
        let (mut app, _rx, _tx) = loaded_app(&["a"], 1);
        app.begin_filter_edit();
        app.requests.push_draft_char('x');
        app.cancel_filter_edit();
        assert_eq!(app.requests.draft_filter(), "");
        assert!(!app.filter_editing);
    }

    #[tokio::test]
    async fn test_unsubscribe_requires_selection() {
        let (mut app, _rx, tx) = loaded_app(&["a"], 1);
        app.request_unsubscribe(&tx);
        assert!(app.pending_confirm.is_none());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg.as_ref(), "Nothing selected");
    }

    #[tokio::test]
    async fn test_unsubscribe_asks_for_confirmation() {
        let (mut app, _rx, tx) = loaded_app(&["a", "b"], 2);
        app.select_all_visible();
        app.request_unsubscribe(&tx);
        assert_eq!(
            app.pending_confirm,
            Some(ConfirmAction::Unsubscribe { count: 2 })
        );
        assert!(!app.selection.is_mutating());

        app.cancel_pending();
        assert!(app.pending_confirm.is_none());
        assert_eq!(app.selection.len(), 2);

        app.request_unsubscribe(&tx);
        app.confirm_pending(&tx);
        assert!(app.selection.is_mutating());
    }

    #[tokio::test]
    async fn test_second_unsubscribe_rejected_while_pending() {
        let config = Config {
            confirm_unsubscribe: false,
            ..Config::default()
        };
        let mut app = test_app_with(&config);
        let (tx, _rx) = mpsc::channel(16);
        app.start(&tx);
        let generation = app.requests.generation();
        app.on_fetch_completed(generation, Ok(outcome(&["a", "b"], 2)));

        app.toggle_highlighted();
        app.request_unsubscribe(&tx);
        assert!(app.selection.is_mutating());

        app.request_unsubscribe(&tx);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("already in progress"));
    }

    #[tokio::test]
    async fn test_unsubscribe_success_removes_items() {
        let config = Config {
            confirm_unsubscribe: false,
            refetch_after_unsubscribe: false,
            ..Config::default()
        };
        let mut app = test_app_with(&config);
        let (tx, _rx) = mpsc::channel(16);
        app.start(&tx);
        let generation = app.requests.generation();
        app.on_fetch_completed(generation, Ok(outcome(&["a", "b", "c"], 3)));

        app.cursor = 2;
        app.toggle_highlighted();
        app.request_unsubscribe(&tx);
        let outcome = app.on_unsubscribe_completed(Ok(()), &tx);

        assert!(matches!(outcome, MutationOutcome::Removed(_)));
        assert!(app.selection.is_empty());
        let ids: Vec<&str> = app.requests.visible_ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(app.requests.total(), 2);
        assert_eq!(app.cursor, 1);
        assert!(!app.requests.is_loading());
    }

    #[tokio::test]
    async fn test_unsubscribe_success_refetches_when_enabled() {
        let (mut app, _rx, tx) = loaded_app(&["a", "b"], 2);
        app.confirm_unsubscribe = false;
        let before = app.requests.generation();
        app.toggle_highlighted();
        app.request_unsubscribe(&tx);
        app.on_unsubscribe_completed(Ok(()), &tx);
        assert_eq!(app.requests.generation(), before + 1);
        assert!(app.requests.is_loading());
    }

    #[tokio::test]
    async fn test_unsubscribe_supersedes_fetch_issued_before_it() {
        let config = Config {
            confirm_unsubscribe: false,
            refetch_after_unsubscribe: false,
            ..Config::default()
        };
        let mut app = test_app_with(&config);
        let (tx, _rx) = mpsc::channel(16);
        app.start(&tx);
        let generation = app.requests.generation();
        app.on_fetch_completed(generation, Ok(outcome(&["a", "b", "c"], 3)));

        app.toggle_highlighted();
        app.request_unsubscribe(&tx);
        app.toggle_sort(&tx);
        let sort_generation = app.requests.generation();

        app.on_unsubscribe_completed(Ok(()), &tx);
        assert_eq!(app.requests.generation(), sort_generation + 1);

        // The sort fetch answers with the list from before the delete
        app.on_fetch_completed(sort_generation, Ok(outcome(&["c", "b", "a"], 3)));
        let ids: Vec<&str> = app.requests.visible_ids().collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(app.requests.is_loading());
    }

    #[tokio::test]
    async fn test_unsubscribe_failure_shows_blocking_error() {
        let (mut app, _rx, tx) = loaded_app(&["a", "b"], 2);
        app.confirm_unsubscribe = false;
        app.select_all_visible();
        app.request_unsubscribe(&tx);
        app.on_unsubscribe_completed(Err("HTTP error: status 500".to_string()), &tx);

        assert_eq!(
            app.error_dialog.as_deref(),
            Some("Unsubscribe failed: HTTP error: status 500")
        );
        assert_eq!(app.selection.len(), 2);
        assert_eq!(app.requests.items().len(), 2);

        app.dismiss_error();
        assert!(app.error_dialog.is_none());
    }

    #[tokio::test]
    async fn test_open_channel_without_link() {
        let (mut app, _rx, _tx) = loaded_app(&["a"], 1);
        app.open_highlighted_channel();
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg.as_ref(), "No channel link for this subscription");
    }

    #[tokio::test]
    async fn test_abandoned_fetch_stops_loading() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(4);
        app.start(&tx);
        assert!(app.requests.is_loading());
        app.on_fetch_abandoned(app.requests.generation());
        assert!(!app.requests.is_loading());
    }
}
