//! # Panorama
//!
//! A terminal dashboard that aggregates news articles, popular movies and
//! social posts into one personalized, infinitely scrolling feed.
//!
//! ## Architecture
//!
//! ```text
//! Providers → Aggregator → Pager → TUI / CLI
//!                 ↘ SearchEngine ↗
//! ```
//!
//! - [`provider`]: NewsAPI, TMDB and mock social sources behind one gateway
//! - [`engine`]: page aggregation, pagination state, search and scroll trigger
//! - [`store`]: SQLite persistence for preferences and favorites
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the first page for the saved categories
//! panorama feed
//!
//! # Search every source
//! panorama search dragon
//!
//! # Launch TUI
//! panorama
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the provider gateway, the aggregator and the search engine.
pub mod app;

/// Stub sign-in flow that only produces notifications.
pub mod auth;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/panorama/config.toml`, supporting:
/// - Per-theme colors (named or hex)
/// - Custom keybindings
/// - Provider endpoints, timeouts and concurrency
pub mod config;

/// Core domain models.
///
/// - [`ContentItem`](domain::ContentItem): article, movie or post
/// - [`PreferenceSet`](domain::PreferenceSet): categories, theme, language
/// - [`FavoritesSet`](domain::FavoritesSet): favorited item ids
pub mod domain;

/// Feed aggregation, pagination, search and infinite scroll.
pub mod engine;

/// Transient user notifications.
pub mod notify;

pub mod provider;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Terminal user interface.
///
/// Three-pane layout built with ratatui: categories sidebar, feed list and
/// item detail, with notification toasts in the top-right corner.
pub mod tui;
