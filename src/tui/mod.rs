pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::app::{AppContext, Result};
use crate::engine::ScrollTrigger;
use crate::notify;
use crate::store::Store;

use self::app::TuiApp;
use self::event::{AppEvent, Effect, EventHandler, Outcome};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>) -> Result<()> {
    let prefs = ctx.store.load_preferences()?;
    let favorites = ctx.store.load_favorites()?;
    let (notifier, center) = notify::channel();
    let mut tui_app = TuiApp::new(
        prefs,
        favorites,
        notifier,
        center,
        &ctx.config.search,
    );

    // Observed for as long as the feed is on screen.
    let mut trigger = ScrollTrigger::new(ctx.config.feed.scroll_threshold);
    let mut observation = trigger.scoped();

    let event_handler = EventHandler::new(Duration::from_millis(100));
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

    let mut effects = tui_app.start();

    loop {
        for effect in effects.drain(..) {
            perform(&ctx, &mut tui_app, &tx, effect);
        }

        terminal.draw(|frame| layout::render(frame, &mut tui_app, &ctx.config.colors))?;

        if let AppEvent::Key(key) = event_handler.next()? {
            effects.extend(tui_app.handle_key(key, &ctx.config.keybindings, Instant::now()));
        }

        while let Ok(outcome) = rx.try_recv() {
            effects.extend(tui_app.apply(outcome));
        }
        effects.extend(tui_app.tick(Instant::now(), &mut observation));

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

fn perform(ctx: &AppContext, tui_app: &mut TuiApp, tx: &UnboundedSender<Outcome>, effect: Effect) {
    match effect {
        Effect::Load(ticket) => {
            let aggregator = ctx.aggregator.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = aggregator.aggregate(&ticket.categories, ticket.page).await;
                let _ = tx.send(Outcome::Loaded(ticket, result));
            });
        }
        Effect::Search(ticket) => {
            let engine = ctx.search.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let results = engine.search(&ticket.query).await;
                let _ = tx.send(Outcome::Searched(ticket, results));
            });
        }
        Effect::SavePreferences => {
            if let Err(e) = ctx.store.save_preferences(&tui_app.prefs) {
                tracing::error!(error = %e, "Failed to save preferences");
                tui_app.set_status(format!("Failed to save preferences: {}", e));
            }
        }
        Effect::AddFavorite(id) => {
            if let Err(e) = ctx.store.add_favorite(&id) {
                tui_app.set_status(format!("Failed to save favorite: {}", e));
            }
        }
        Effect::RemoveFavorite(id) => {
            if let Err(e) = ctx.store.remove_favorite(&id) {
                tui_app.set_status(format!("Failed to remove favorite: {}", e));
            }
        }
        Effect::Open(link) => {
            if let Err(e) = open::that(&link) {
                tui_app.set_status(format!("Failed to open browser: {}", e));
            }
        }
    }
}
