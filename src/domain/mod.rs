pub mod feed;
pub mod item;
pub mod preferences;
pub mod state;

pub use feed::AggregationResult;
pub use item::{Article, Author, ContentItem, ContentKind, Movie, Post};
pub use preferences::{
    is_reserved_category, PreferenceSet, Theme, AVAILABLE_CATEGORIES, DEFAULT_CATEGORIES,
};
pub use state::FavoritesSet;
