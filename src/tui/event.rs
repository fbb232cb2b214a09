use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

use crate::app::Result;
use crate::domain::{AggregationResult, ContentItem};
use crate::engine::{LoadTicket, SearchTicket};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(AppEvent::Key(key));
                }
            }
        }
        Ok(AppEvent::Tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    NextPane,
    PrevPane,
    Select,
    ToggleFavorite,
    OpenInBrowser,
    Refresh,
    LoadMore,
    ToggleTheme,
    ToggleNotifications,
    Search,
    Clear,
    FavoritesView,
    DismissNotification,
    Login,
    Signup,
    Logout,
    None,
}

/// Work the UI asks the runtime to do on its behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Load(LoadTicket),
    Search(SearchTicket),
    SavePreferences,
    AddFavorite(String),
    RemoveFavorite(String),
    Open(String),
}

/// Results of spawned work, fed back into the UI state.
#[derive(Debug)]
pub enum Outcome {
    Loaded(LoadTicket, crate::app::Result<AggregationResult>),
    Searched(SearchTicket, Vec<ContentItem>),
}
