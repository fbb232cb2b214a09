pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::Theme;

#[derive(Parser)]
#[command(name = "panorama")]
#[command(about = "A personalized dashboard for news, movies and social posts", long_about = None)]
pub struct Cli {
    /// Category requests in flight at once (overrides the config file)
    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    /// Launches the TUI when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI
    Tui,
    /// Print one page of the aggregated feed
    Feed {
        /// Category to include (repeatable; defaults to saved preferences)
        #[arg(short = 'c', long = "category")]
        categories: Vec<String>,

        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Search articles, movies and posts
    Search {
        /// Free-text query
        query: String,
    },
    /// Show or change the selected categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Show or set the color theme
    Theme {
        /// light or dark
        theme: Option<Theme>,
    },
    /// Enable or disable in-app notifications
    Notifications { state: Switch },
    /// Show or set the preferred language
    Language { tag: Option<String> },
    /// Manage favorite items
    Favorites {
        #[command(subcommand)]
        action: FavoriteAction,
    },
    /// Print the stored preferences as JSON, or reset them
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print the stored preferences as JSON
    Show,
    /// Restore categories, theme, language and notifications to defaults
    Reset,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List selected and available categories
    List,
    /// Select a category
    Add { name: String },
    /// Deselect a category
    Remove { name: String },
    /// Restore the default selection
    Reset,
}

#[derive(Subcommand)]
pub enum FavoriteAction {
    /// List favorite item ids
    List,
    /// Mark an item id as favorite
    Add { id: String },
    /// Unmark an item id
    Remove { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        self == Switch::On
    }
}
