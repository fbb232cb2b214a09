use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;

use crate::auth::StubAuthenticator;
use crate::config::{KeybindingConfig, SearchConfig};
use crate::domain::{ContentItem, FavoritesSet, PreferenceSet, Theme, AVAILABLE_CATEGORIES};
use crate::engine::{Debouncer, LoadKind, Pager, ScrollTrigger, SearchController, Viewport};
use crate::notify::{NotificationCenter, Notifier};
use crate::tui::event::{Action, Effect, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Sidebar,
    Feed,
    Detail,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Sidebar => ActivePane::Feed,
            ActivePane::Feed => ActivePane::Detail,
            ActivePane::Detail => ActivePane::Sidebar,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActivePane::Sidebar => ActivePane::Detail,
            ActivePane::Feed => ActivePane::Sidebar,
            ActivePane::Detail => ActivePane::Feed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarRow {
    Category { name: String, selected: bool },
    Theme(Theme),
    Notifications(bool),
}

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountMode {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Name,
    Email,
    Password,
}

/// Sign-in form, filled one field at a time in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountPrompt {
    pub mode: AccountMode,
    pub field: AccountField,
    pub input: String,
    name: String,
    email: String,
}

impl AccountPrompt {
    pub fn new(mode: AccountMode) -> Self {
        let field = match mode {
            AccountMode::Login => AccountField::Email,
            AccountMode::Signup => AccountField::Name,
        };
        Self {
            mode,
            field,
            input: String::new(),
            name: String::new(),
            email: String::new(),
        }
    }

    /// Status bar text; the password is masked.
    pub fn display(&self) -> String {
        let title = match self.mode {
            AccountMode::Login => "Sign in",
            AccountMode::Signup => "Sign up",
        };
        let (label, value) = match self.field {
            AccountField::Name => ("name", self.input.clone()),
            AccountField::Email => ("email", self.input.clone()),
            AccountField::Password => ("password", "*".repeat(self.input.chars().count())),
        };
        format!("{} {}: {}", title, label, value)
    }

    /// Keep the current input and move on. `false` once the password,
    /// the last field, has been entered.
    fn advance(&mut self) -> bool {
        match self.field {
            AccountField::Name => {
                self.name = std::mem::take(&mut self.input);
                self.field = AccountField::Email;
                true
            }
            AccountField::Email => {
                self.email = std::mem::take(&mut self.input);
                self.field = AccountField::Password;
                true
            }
            AccountField::Password => false,
        }
    }
}

pub struct TuiApp {
    pub active_pane: ActivePane,
    pub prefs: PreferenceSet,
    pub favorites: FavoritesSet,
    pub pager: Pager,
    pub search: SearchController,
    /// `Some` while the search prompt has focus.
    pub search_input: Option<String>,
    /// `Some` while the sign-in prompt has focus.
    pub account: Option<AccountPrompt>,
    pub auth: StubAuthenticator,
    pub favorites_only: bool,
    pub sidebar_index: usize,
    pub feed_index: usize,
    pub detail_scroll: u16,
    pub sidebar_list_state: ListState,
    pub feed_list_state: ListState,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub notifications: NotificationCenter,
    notifier: Notifier,
    debouncer: Debouncer,
    // Categories changed while a load was in flight.
    reload_pending: bool,
}

impl TuiApp {
    pub fn new(
        prefs: PreferenceSet,
        favorites: FavoritesSet,
        notifier: Notifier,
        mut notifications: NotificationCenter,
        search: &SearchConfig,
    ) -> Self {
        notifications.set_enabled(prefs.notifications);

        let mut sidebar_list_state = ListState::default();
        sidebar_list_state.select(Some(0));

        Self {
            active_pane: ActivePane::Feed,
            prefs,
            favorites,
            pager: Pager::new(),
            search: SearchController::new(),
            search_input: None,
            account: None,
            auth: StubAuthenticator::new(notifier.clone()),
            favorites_only: false,
            sidebar_index: 0,
            feed_index: 0,
            detail_scroll: 0,
            sidebar_list_state,
            feed_list_state: ListState::default(),
            status_message: None,
            should_quit: false,
            notifications,
            notifier,
            debouncer: Debouncer::new(search.debounce()),
            reload_pending: false,
        }
    }

    /// Effects to run once the UI is up.
    pub fn start(&mut self) -> Vec<Effect> {
        self.reload()
    }

    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        let mut rows: Vec<SidebarRow> = AVAILABLE_CATEGORIES
            .iter()
            .map(|c| SidebarRow::Category {
                name: c.to_string(),
                selected: self.prefs.has_category(c),
            })
            .collect();
        rows.extend(
            self.prefs
                .categories
                .iter()
                .filter(|c| !AVAILABLE_CATEGORIES.contains(&c.as_str()))
                .map(|c| SidebarRow::Category {
                    name: c.clone(),
                    selected: true,
                }),
        );
        rows.push(SidebarRow::Theme(self.prefs.theme));
        rows.push(SidebarRow::Notifications(self.prefs.notifications));
        rows
    }

    /// Search results while a search is active, the paged feed otherwise.
    pub fn visible_items(&self) -> Vec<&ContentItem> {
        let source = if self.search.is_active() {
            self.search.results()
        } else {
            self.pager.items()
        };
        source
            .iter()
            .filter(|i| !self.favorites_only || self.favorites.contains(i.id()))
            .collect()
    }

    pub fn selected_item(&self) -> Option<&ContentItem> {
        self.visible_items().into_iter().nth(self.feed_index)
    }

    pub fn is_favorite(&self, item: &ContentItem) -> bool {
        self.favorites.contains(item.id())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        bindings: &KeybindingConfig,
        now: Instant,
    ) -> Vec<Effect> {
        if self.account.is_some() {
            self.handle_account_input(key);
            return Vec::new();
        }
        if self.search_input.is_some() {
            return self.handle_search_input(key, now);
        }
        self.handle_action(bindings.get_action(&key))
    }

    fn handle_search_input(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        let Some(input) = self.search_input.as_mut() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc => {
                self.clear_search();
                Vec::new()
            }
            KeyCode::Enter => {
                let text = input.clone();
                self.search_input = None;
                self.debouncer.cancel();
                self.submit_query(&text)
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Backspace => {
                input.pop();
                self.debouncer.push(input.clone(), now);
                Vec::new()
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.debouncer.push(input.clone(), now);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_account_input(&mut self, key: KeyEvent) {
        let Some(prompt) = self.account.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.account = None,
            KeyCode::Enter => {
                if !prompt.advance() {
                    if let Some(prompt) = self.account.take() {
                        self.submit_account(prompt);
                    }
                }
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(c) => prompt.input.push(c),
            _ => {}
        }
    }

    fn submit_account(&mut self, prompt: AccountPrompt) {
        let result = match prompt.mode {
            AccountMode::Login => self
                .auth
                .login(&prompt.email, &prompt.input, None)
                .map(|_| ()),
            AccountMode::Signup => self
                .auth
                .signup(&prompt.name, &prompt.email, &prompt.input)
                .map(|_| ()),
        };
        match result {
            Ok(()) => self.status_message = None,
            Err(e) => self.set_status(format!("Sign-in failed: {}", e)),
        }
    }

    fn open_account_prompt(&mut self, mode: AccountMode) {
        match self.auth.user() {
            Some(user) => {
                let message = format!("Already signed in as {}", user.name);
                self.set_status(message);
            }
            None => self.account = Some(AccountPrompt::new(mode)),
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::MoveUp => self.move_by(-1),
            Action::MoveDown => self.move_by(1),
            Action::PageUp => self.move_by(-(PAGE_SIZE as isize)),
            Action::PageDown => self.move_by(PAGE_SIZE as isize),
            Action::NextPane => {
                self.active_pane = self.active_pane.next();
            }
            Action::PrevPane => {
                self.active_pane = self.active_pane.prev();
            }
            Action::Select => match self.active_pane {
                ActivePane::Sidebar => return self.activate_sidebar_row(),
                ActivePane::Feed => self.active_pane = ActivePane::Detail,
                ActivePane::Detail => {}
            },
            Action::ToggleFavorite => return self.toggle_favorite(),
            Action::OpenInBrowser => {
                if let Some(link) = self.selected_item().and_then(|i| i.link()) {
                    return vec![Effect::Open(link)];
                }
                self.set_status("Nothing to open");
            }
            Action::Refresh => {
                self.set_status("Reloading...");
                return self.reload();
            }
            Action::LoadMore => return self.load_more(),
            Action::ToggleTheme => {
                let theme = self.prefs.toggle_theme();
                self.notifier
                    .info("Theme changed", format!("Switched to {} theme", theme));
                return vec![Effect::SavePreferences];
            }
            Action::ToggleNotifications => return self.toggle_notifications(),
            Action::Search => {
                self.search_input = Some(self.search.query().to_string());
            }
            Action::Clear => {
                if self.search.is_active() {
                    self.clear_search();
                } else if self.favorites_only {
                    self.toggle_favorites_view();
                } else {
                    self.status_message = None;
                }
            }
            Action::FavoritesView => self.toggle_favorites_view(),
            Action::DismissNotification => {
                if let Some(id) = self.notifications.latest().map(|n| n.id) {
                    self.notifications.dismiss(id);
                }
            }
            Action::Login => self.open_account_prompt(AccountMode::Login),
            Action::Signup => self.open_account_prompt(AccountMode::Signup),
            Action::Logout => {
                if self.auth.is_logged_in() {
                    self.auth.logout();
                } else {
                    self.set_status("Not signed in");
                }
            }
            Action::None => {}
        }
        Vec::new()
    }

    /// Apply the result of spawned work.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        match outcome {
            Outcome::Loaded(ticket, result) => {
                let failure = result.as_ref().err().map(|e| e.to_string());
                if !self.pager.complete(&ticket, result) {
                    return Vec::new();
                }
                match failure {
                    Some(message) => {
                        self.notifier.error("Failed to load content", message);
                    }
                    None if ticket.kind == LoadKind::Initial && !self.search.is_active() => {
                        self.feed_index = 0;
                    }
                    None => {}
                }
                self.clamp_feed_selection();

                if std::mem::take(&mut self.reload_pending) {
                    return self.reload();
                }
            }
            Outcome::Searched(ticket, results) => {
                if self.search.complete(&ticket, results) {
                    self.feed_index = 0;
                    self.clamp_feed_selection();
                }
            }
        }
        Vec::new()
    }

    /// Periodic work: notifications, debounced search and the load-more
    /// trigger. The trigger only follows the paged feed; it is detached
    /// while search results or the favorites view are shown.
    pub fn tick(&mut self, now: Instant, trigger: &mut ScrollTrigger) -> Vec<Effect> {
        self.notifications.pump(now);

        let mut effects = Vec::new();
        if let Some(text) = self.debouncer.poll(now) {
            effects.extend(self.submit_query(&text));
        }

        if self.search.is_active() || self.favorites_only {
            trigger.detach();
        } else {
            trigger.attach();
        }

        let viewport = Viewport::new(self.feed_index, self.visible_items().len());
        if trigger.observe(viewport, self.pager.has_more(), self.pager.is_loading()) {
            effects.extend(self.load_more());
        }
        effects
    }

    fn reload(&mut self) -> Vec<Effect> {
        match self.pager.request_initial_load(self.prefs.categories.clone()) {
            Some(ticket) => vec![Effect::Load(ticket)],
            None => {
                self.reload_pending = true;
                Vec::new()
            }
        }
    }

    fn load_more(&mut self) -> Vec<Effect> {
        if self.search.is_active() {
            return Vec::new();
        }
        self.pager.request_more().map(Effect::Load).into_iter().collect()
    }

    fn submit_query(&mut self, text: &str) -> Vec<Effect> {
        self.feed_index = 0;
        let effects = match self.search.set_query(text) {
            Some(ticket) => vec![Effect::Search(ticket)],
            None => Vec::new(),
        };
        self.clamp_feed_selection();
        effects
    }

    fn clear_search(&mut self) {
        self.search_input = None;
        self.debouncer.cancel();
        self.search.clear();
        self.feed_index = 0;
        self.clamp_feed_selection();
    }

    fn toggle_favorites_view(&mut self) {
        self.favorites_only = !self.favorites_only;
        self.feed_index = 0;
        self.clamp_feed_selection();
    }

    fn activate_sidebar_row(&mut self) -> Vec<Effect> {
        let Some(row) = self.sidebar_rows().into_iter().nth(self.sidebar_index) else {
            return Vec::new();
        };
        match row {
            SidebarRow::Category { name, .. } => {
                self.prefs.toggle_category(&name);
                let mut effects = vec![Effect::SavePreferences];
                effects.extend(self.reload());
                effects
            }
            SidebarRow::Theme(_) => self.handle_action(Action::ToggleTheme),
            SidebarRow::Notifications(_) => self.toggle_notifications(),
        }
    }

    fn toggle_notifications(&mut self) -> Vec<Effect> {
        let enabled = !self.prefs.notifications;
        self.prefs.set_notifications(enabled);
        self.notifications.set_enabled(enabled);
        if enabled {
            self.notifier.info("Notifications enabled", "");
        } else {
            self.notifications.clear();
            self.set_status("Notifications disabled");
        }
        vec![Effect::SavePreferences]
    }

    fn toggle_favorite(&mut self) -> Vec<Effect> {
        let Some((id, title)) = self
            .selected_item()
            .map(|i| (i.id().to_string(), i.title().to_string()))
        else {
            return Vec::new();
        };

        let effect = if self.favorites.toggle(&id) {
            self.notifier.success("Added to favorites", title);
            Effect::AddFavorite(id)
        } else {
            self.notifier.info("Removed from favorites", title);
            Effect::RemoveFavorite(id)
        };
        self.clamp_feed_selection();
        vec![effect]
    }

    fn move_by(&mut self, delta: isize) {
        match self.active_pane {
            ActivePane::Sidebar => {
                let max = self.sidebar_rows().len().saturating_sub(1);
                self.sidebar_index = step(self.sidebar_index, delta, max);
                self.sidebar_list_state.select(Some(self.sidebar_index));
            }
            ActivePane::Feed => {
                let max = self.visible_items().len().saturating_sub(1);
                let index = step(self.feed_index, delta, max);
                if index != self.feed_index {
                    self.feed_index = index;
                    self.detail_scroll = 0;
                }
                self.clamp_feed_selection();
            }
            ActivePane::Detail => {
                self.detail_scroll = if delta < 0 {
                    self.detail_scroll.saturating_sub(delta.unsigned_abs() as u16)
                } else {
                    self.detail_scroll.saturating_add(delta as u16)
                };
            }
        }
    }

    fn clamp_feed_selection(&mut self) {
        let len = self.visible_items().len();
        if len == 0 {
            self.feed_index = 0;
            self.feed_list_state.select(None);
        } else {
            self.feed_index = self.feed_index.min(len - 1);
            self.feed_list_state.select(Some(self.feed_index));
        }
    }
}

fn step(index: usize, delta: isize, max: usize) -> usize {
    index.saturating_add_signed(delta).min(max)
}
