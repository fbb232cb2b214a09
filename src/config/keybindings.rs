//! Keybinding configuration for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

/// Configuration for all keybindings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub page_up: Vec<String>,
    pub page_down: Vec<String>,
    pub next_pane: Vec<String>,
    pub prev_pane: Vec<String>,
    pub select: Vec<String>,
    pub toggle_favorite: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub refresh: Vec<String>,
    pub load_more: Vec<String>,
    pub toggle_theme: Vec<String>,
    pub toggle_notifications: Vec<String>,
    pub search: Vec<String>,
    pub clear: Vec<String>,
    pub favorites_view: Vec<String>,
    pub dismiss_notification: Vec<String>,
    pub login: Vec<String>,
    pub signup: Vec<String>,
    pub logout: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| k.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            page_up: keys(&["PageUp"]),
            page_down: keys(&["PageDown"]),
            next_pane: keys(&["Tab"]),
            prev_pane: keys(&["BackTab", "Shift+Tab"]),
            select: keys(&["Enter", "Space"]),
            toggle_favorite: keys(&["f"]),
            open_in_browser: keys(&["o"]),
            refresh: keys(&["R"]),
            load_more: keys(&["m"]),
            toggle_theme: keys(&["t"]),
            toggle_notifications: keys(&["N"]),
            search: keys(&["/"]),
            clear: keys(&["Esc"]),
            favorites_view: keys(&["F"]),
            dismiss_notification: keys(&["x"]),
            login: keys(&["L"]),
            signup: keys(&["S"]),
            logout: keys(&["U"]),
        }
    }
}

impl KeybindingConfig {
    /// Get the action for a key event.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 21] = [
            (&self.quit, Action::Quit),
            (&self.move_up, Action::MoveUp),
            (&self.move_down, Action::MoveDown),
            (&self.page_up, Action::PageUp),
            (&self.page_down, Action::PageDown),
            (&self.next_pane, Action::NextPane),
            (&self.prev_pane, Action::PrevPane),
            (&self.select, Action::Select),
            (&self.toggle_favorite, Action::ToggleFavorite),
            (&self.open_in_browser, Action::OpenInBrowser),
            (&self.refresh, Action::Refresh),
            (&self.load_more, Action::LoadMore),
            (&self.toggle_theme, Action::ToggleTheme),
            (&self.toggle_notifications, Action::ToggleNotifications),
            (&self.search, Action::Search),
            (&self.clear, Action::Clear),
            (&self.favorites_view, Action::FavoritesView),
            (&self.dismiss_notification, Action::DismissNotification),
            (&self.login, Action::Login),
            (&self.signup, Action::Signup),
            (&self.logout, Action::Logout),
        ];
        table
            .into_iter()
            .find(|(bindings, _)| self.matches_key(key, bindings))
            .map(|(_, action)| action)
            .unwrap_or(Action::None)
    }

    fn matches_key(&self, key: &KeyEvent, bindings: &[String]) -> bool {
        bindings.iter().any(|binding| {
            if let Ok(parsed) = parse_key_string(binding) {
                parsed.matches(key)
            } else {
                false
            }
        })
    }
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Check if this binding matches a key event.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse a key string into a KeyBinding.
///
/// Supported formats:
/// - Single characters: "a", "A", "1", "/"
/// - Special keys: "Enter", "Tab", "BackTab", "Backspace", "Delete", "Home", "End",
///   "PageUp", "PageDown", "Up", "Down", "Left", "Right", "Esc", "Space", "F1"-"F12"
/// - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter", "Ctrl+Shift+a"
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let parts: Vec<&str> = s.split('+').collect();

    let mut modifiers = KeyModifiers::NONE;
    let key_part = if parts.len() > 1 {
        // Parse modifiers
        for part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "alt" => modifiers |= KeyModifiers::ALT,
                _ => return Err(format!("Unknown modifier: {}", part)),
            }
        }
        parts[parts.len() - 1]
    } else {
        s
    };

    let code = parse_key_code(key_part)?;

    Ok(KeyBinding { code, modifiers })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        _ => Err(format!("Unknown key: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_single_char() {
        let binding = parse_key_string("/").unwrap();
        assert_eq!(binding.code, KeyCode::Char('/'));
        assert_eq!(binding.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_key_string("Esc").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key_string("Space").unwrap().code, KeyCode::Char(' '));
        assert_eq!(parse_key_string("PageDown").unwrap().code, KeyCode::PageDown);
        assert_eq!(parse_key_string("F12").unwrap().code, KeyCode::F(12));
        assert!(parse_key_string("F13").is_err());
        assert!(parse_key_string("Hyper").is_err());
    }

    #[test]
    fn test_parse_modifiers() {
        let binding = parse_key_string("Ctrl+Shift+a").unwrap();
        assert_eq!(binding.code, KeyCode::Char('a'));
        assert_eq!(
            binding.modifiers,
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        );
        assert!(parse_key_string("Super+a").is_err());
    }

    #[test]
    fn test_keybinding_matches() {
        let binding = parse_key_string("Ctrl+c").unwrap();
        assert!(binding.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!binding.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_default_actions() {
        let config = KeybindingConfig::default();

        assert_eq!(
            config.get_action(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char(' '), KeyModifiers::NONE)),
            Action::Select
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('f'), KeyModifiers::NONE)),
            Action::ToggleFavorite
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('/'), KeyModifiers::NONE)),
            Action::Search
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Esc, KeyModifiers::NONE)),
            Action::Clear
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('z'), KeyModifiers::NONE)),
            Action::None
        );
    }

    #[test]
    fn test_shifted_letters() {
        let config = KeybindingConfig::default();
        assert_eq!(
            config.get_action(&press(KeyCode::Char('F'), KeyModifiers::SHIFT)),
            Action::FavoritesView
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('N'), KeyModifiers::SHIFT)),
            Action::ToggleNotifications
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Action::Refresh
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('L'), KeyModifiers::SHIFT)),
            Action::Login
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('U'), KeyModifiers::SHIFT)),
            Action::Logout
        );
    }

    #[test]
    fn test_override_from_toml() {
        let config: KeybindingConfig = toml::from_str(r#"toggle_theme = ["T", "F2"]"#).unwrap();
        assert_eq!(
            config.get_action(&press(KeyCode::F(2), KeyModifiers::NONE)),
            Action::ToggleTheme
        );
        assert_eq!(
            config.get_action(&press(KeyCode::Char('t'), KeyModifiers::NONE)),
            Action::None
        );
        assert_eq!(config.quit, vec!["q", "Ctrl+c"]);
    }
}
