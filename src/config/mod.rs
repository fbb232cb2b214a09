//! Configuration management for Panorama.
//!
//! Configuration is read from `~/.config/panorama/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::{ColorConfig, ThemeColors};
pub use keybindings::KeybindingConfig;

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::scroll::DEFAULT_THRESHOLD;
use crate::engine::search::DEFAULT_DEBOUNCE;
use crate::provider::ProviderConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ThemeColors,
    pub keybindings: KeybindingConfig,
    pub providers: ProviderConfig,
    pub feed: FeedConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Rows from the end of the feed at which the next page is requested
    pub scroll_threshold: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/panorama/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("panorama").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        tracing::info!(path = %path.display(), "Wrote default configuration");
        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# Panorama Configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "A", "/"
# - Special keys: Enter, Tab, BackTab, Backspace, Delete, Home, End,
#   PageUp, PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter"
#
# API keys are read from the NEWS_API_KEY and TMDB_API_KEY environment
# variables. Without them the providers fall back to sample content.

[colors.light]
active_border = "Blue"
inactive_border = "Gray"
text = "Black"
muted = "DarkGray"
favorite = "Red"

[colors.dark]
active_border = "Cyan"
inactive_border = "DarkGray"
text = "White"
muted = "Gray"
favorite = "LightRed"

[keybindings]
# Navigation
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
page_up = ["PageUp"]
page_down = ["PageDown"]
next_pane = ["Tab"]
prev_pane = ["BackTab", "Shift+Tab"]

# Actions
select = ["Enter", "Space"]
toggle_favorite = ["f"]
open_in_browser = ["o"]
refresh = ["R"]
load_more = ["m"]
toggle_theme = ["t"]
toggle_notifications = ["N"]
search = ["/"]
clear = ["Esc"]
favorites_view = ["F"]
dismiss_notification = ["x"]

# Account (local session only)
login = ["L"]
signup = ["S"]
logout = ["U"]

[providers]
news_base_url = "https://newsapi.org/v2"
tmdb_base_url = "https://api.themoviedb.org/3"

# Articles requested per category and page
page_size = 10

# HTTP request timeout in seconds
http_timeout_secs = 10

# Upper bound for a single provider call in seconds
provider_timeout_secs = 15

# Simulated latency of the social feed in milliseconds
social_latency_ms = 500

# Category requests in flight at once
max_concurrency = 4

[feed]
# Request the next page when the selection is this close to the end
scroll_threshold = 3

[search]
# Wait this long after the last keystroke before searching (milliseconds)
debounce_ms = 300
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
