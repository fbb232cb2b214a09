pub mod sqlite;

use crate::app::Result;
use crate::domain::{FavoritesSet, PreferenceSet};

pub use sqlite::SqliteStore;

/// Persistence for the user-owned state that survives restarts.
pub trait Store {
    // Preferences
    fn load_preferences(&self) -> Result<PreferenceSet>;
    fn save_preferences(&self, prefs: &PreferenceSet) -> Result<()>;

    // Favorites
    fn load_favorites(&self) -> Result<FavoritesSet>;
    fn add_favorite(&self, item_id: &str) -> Result<bool>;
    fn remove_favorite(&self, item_id: &str) -> Result<bool>;
}
