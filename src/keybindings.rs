//! Keybinding registry: maps actions to key events, with config overrides.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    Back,
    ToggleSelect,
    SelectAllVisible,
    DeselectAllVisible,
    Unsubscribe,
    NextPage,
    PrevPage,
    ToggleSort,
    EnterFilter,
    ApplyFilter,
    CancelFilter,
    ClearFilter,
    Reload,
    ForceRefresh,
    OpenChannel,
    Login,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::Back => "Dismiss message",
            Self::ToggleSelect => "Toggle selection",
            Self::SelectAllVisible => "Select all on this page",
            Self::DeselectAllVisible => "Deselect all on this page",
            Self::Unsubscribe => "Unsubscribe from selected",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::ToggleSort => "Toggle sort by video count",
            Self::EnterFilter => "Edit channel filter",
            Self::ApplyFilter => "Apply filter",
            Self::CancelFilter => "Stop editing filter",
            Self::ClearFilter => "Clear filter",
            Self::Reload => "Reload current page",
            Self::ForceRefresh => "Refresh backend cache and reload",
            Self::OpenChannel => "Open channel in browser",
            Self::Login => "Log in via browser",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context. Determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    List,
    FilterInput,
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right", "Backspace", "Space"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let rest = rest.trim();
        let mut chars = rest.chars();
        let c = chars.next()?;
        return chars.next().is_none().then(|| KeySpec::ctrl(c));
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::plain(KeyCode::Char(' '))),
        _ => {}
    }

    if let Some(n) = s.strip_prefix(['F', 'f']) {
        if let Ok(n) = n.parse::<u8>() {
            if (1..=12).contains(&n) {
                return Some(KeySpec::plain(KeyCode::F(n)));
            }
        }
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then(|| KeySpec::plain(KeyCode::Char(c)))
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to `Global`.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;
        use KeyCode::*;

        let global = [
            (KeySpec::plain(Char('q')), Quit),
            (KeySpec::ctrl('c'), Quit),
            (KeySpec::plain(Char('?')), ShowHelp),
            (KeySpec::plain(Esc), Back),
            (KeySpec::plain(Char('L')), Login),
        ];
        for (key, action) in global {
            self.bind(Context::Global, key, action);
        }

        let list = [
            (KeySpec::plain(Char('j')), NavDown),
            (KeySpec::plain(Down), NavDown),
            (KeySpec::plain(Char('k')), NavUp),
            (KeySpec::plain(Up), NavUp),
            (KeySpec::plain(Char(' ')), ToggleSelect),
            (KeySpec::plain(Char('a')), SelectAllVisible),
            (KeySpec::plain(Char('A')), DeselectAllVisible),
            (KeySpec::plain(Char('d')), Unsubscribe),
            (KeySpec::plain(Char('l')), NextPage),
            (KeySpec::plain(Right), NextPage),
            (KeySpec::plain(Char('h')), PrevPage),
            (KeySpec::plain(Left), PrevPage),
            (KeySpec::plain(Char('s')), ToggleSort),
            (KeySpec::plain(Char('/')), EnterFilter),
            (KeySpec::plain(Char('c')), ClearFilter),
            (KeySpec::plain(Char('r')), Reload),
            (KeySpec::plain(Char('R')), ForceRefresh),
            (KeySpec::plain(Char('o')), OpenChannel),
        ];
        for (key, action) in list {
            self.bind(Context::List, key, action);
        }

        let filter = [
            (KeySpec::plain(Enter), ApplyFilter),
            (KeySpec::plain(Esc), CancelFilter),
        ];
        for (key, action) in filter {
            self.bind(Context::FilterInput, key, action);
        }
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "next_page").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts_for_action: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts_for_action.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts_for_action {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then `Global`.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Terminals report Shift with uppercase chars; the char already encodes it
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// First key bound to `action`, formatted for hints in the status bar.
    pub fn key_for(&self, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(_, _, a)| *a == action)
            .map(|(_, key, _)| format_key(key))
    }

    /// Get all bindings for the help screen as
    /// (context, key display string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "back" => Some(Action::Back),
        "toggle_select" | "select" => Some(Action::ToggleSelect),
        "select_all" | "select_all_visible" => Some(Action::SelectAllVisible),
        "deselect_all" | "deselect_all_visible" => Some(Action::DeselectAllVisible),
        "unsubscribe" | "delete" => Some(Action::Unsubscribe),
        "next_page" | "next" => Some(Action::NextPage),
        "prev_page" | "previous_page" | "prev" => Some(Action::PrevPage),
        "toggle_sort" | "sort" => Some(Action::ToggleSort),
        "enter_filter" | "filter" => Some(Action::EnterFilter),
        "apply_filter" => Some(Action::ApplyFilter),
        "cancel_filter" => Some(Action::CancelFilter),
        "clear_filter" => Some(Action::ClearFilter),
        "reload" => Some(Action::Reload),
        "force_refresh" | "refresh" => Some(Action::ForceRefresh),
        "open_channel" | "open" => Some(Action::OpenChannel),
        "login" => Some(Action::Login),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_quit() {
        let reg = KeybindingRegistry::new();
        let action = reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::Global);
        assert_eq!(action, Some(Action::Quit));
    }

    #[test]
    fn test_list_falls_back_to_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('q'), KeyModifiers::NONE, Context::List),
            Some(Action::Quit)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char(' '), KeyModifiers::NONE, Context::List),
            Some(Action::ToggleSelect)
        );
    }

    #[test]
    fn test_filter_context_overrides_global_esc() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::FilterInput),
            Some(Action::CancelFilter)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Esc, KeyModifiers::NONE, Context::List),
            Some(Action::Back)
        );
    }

    #[test]
    fn test_list_keys_inactive_in_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('d'), KeyModifiers::NONE, Context::Global),
            None
        );
    }

    #[test]
    fn test_ctrl_c_quits() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('c'), KeyModifiers::CONTROL, Context::List),
            Some(Action::Quit)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('c'), KeyModifiers::NONE, Context::List),
            Some(Action::ClearFilter)
        );
    }

    #[test]
    fn test_shift_ignored_for_chars() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('R'), KeyModifiers::SHIFT, Context::List),
            Some(Action::ForceRefresh)
        );
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("force_refresh".to_string(), "F5".to_string());

        let warnings = reg.apply_overrides(&overrides);
        assert!(warnings.is_empty());
        assert_eq!(
            reg.action_for_key(KeyCode::F(5), KeyModifiers::NONE, Context::List),
            Some(Action::ForceRefresh)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('R'), KeyModifiers::NONE, Context::List),
            None
        );
    }

    #[test]
    fn test_apply_overrides_rebinds_all_keys_of_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("next_page".to_string(), "n".to_string());
        reg.apply_overrides(&overrides);

        assert_eq!(
            reg.action_for_key(KeyCode::Char('n'), KeyModifiers::NONE, Context::List),
            Some(Action::NextPage)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Right, KeyModifiers::NONE, Context::List),
            None
        );
    }

    #[test]
    fn test_apply_overrides_unknown_action() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("launch_rockets".to_string(), "x".to_string());
        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));
    }

    #[test]
    fn test_apply_overrides_bad_key() {
        let mut reg = KeybindingRegistry::new();
        let mut overrides = HashMap::new();
        overrides.insert("quit".to_string(), "Hyper+q".to_string());
        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_parse_key_string_forms() {
        assert_eq!(
            parse_key_string("Enter"),
            Some(KeySpec::plain(KeyCode::Enter))
        );
        assert_eq!(
            parse_key_string("space"),
            Some(KeySpec::plain(KeyCode::Char(' ')))
        );
        assert_eq!(parse_key_string("F12"), Some(KeySpec::plain(KeyCode::F(12))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+r"), Some(KeySpec::ctrl('r')));
        assert_eq!(parse_key_string("x"), Some(KeySpec::plain(KeyCode::Char('x'))));
        assert_eq!(parse_key_string("xy"), None);
        assert_eq!(parse_key_string(""), None);
    }

    #[test]
    fn test_key_for_and_format() {
        let reg = KeybindingRegistry::new();
        assert_eq!(reg.key_for(Action::ToggleSelect).as_deref(), Some("Space"));
        assert_eq!(reg.key_for(Action::Quit).as_deref(), Some("q"));
        assert_eq!(format_key(&KeySpec::ctrl('c')), "Ctrl+c");
    }

    #[test]
    fn test_all_bindings_non_empty() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        assert!(bindings
            .iter()
            .any(|(ctx, _, action, _)| *ctx == Context::List && *action == Action::Unsubscribe));
    }
}
