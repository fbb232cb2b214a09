use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categories the dashboard offers in its category filter.
pub const AVAILABLE_CATEGORIES: &[&str] = &[
    "technology",
    "sports",
    "business",
    "entertainment",
    "science",
    "health",
];

pub const DEFAULT_CATEGORIES: &[&str] = &["technology", "sports", "business", "entertainment"];

/// Labels that would collide with the movie/post identifier scheme.
pub const RESERVED_CATEGORIES: &[&str] = &["movie", "social"];

pub fn is_reserved_category(category: &str) -> bool {
    RESERVED_CATEGORIES.contains(&category.trim())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// User-mutable dashboard preferences.
///
/// `categories` never holds duplicates or blank labels; its order is only
/// kept so the sidebar renders stably.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSet {
    pub categories: Vec<String>,
    pub theme: Theme,
    pub notifications: bool,
    pub language: String,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            theme: Theme::Light,
            notifications: true,
            language: "en".to_string(),
        }
    }
}

impl PreferenceSet {
    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.clear();
        for category in categories {
            self.add_category(category);
        }
    }

    /// Returns `true` if the category was added.
    pub fn add_category(&mut self, category: impl Into<String>) -> bool {
        let category = category.into();
        let category = category.trim();
        if category.is_empty() || self.has_category(category) {
            return false;
        }
        self.categories.push(category.to_string());
        true
    }

    /// Returns `true` if the category was present.
    pub fn remove_category(&mut self, category: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c != category.trim());
        self.categories.len() != before
    }

    /// Returns whether the category is selected afterwards.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if self.remove_category(category) {
            false
        } else {
            self.add_category(category)
        }
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    pub fn set_notifications(&mut self, enabled: bool) {
        self.notifications = enabled;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Repair a rehydrated set: drop blanks and duplicates.
    pub fn normalized(mut self) -> Self {
        let categories = std::mem::take(&mut self.categories);
        self.set_categories(categories);
        self
    }
}
