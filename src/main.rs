use std::io;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use panorama::app::AppContext;
use panorama::cli::{commands, CategoryAction, Cli, Commands, FavoriteAction, PrefsAction};
use panorama::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with command output.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(concurrency) = cli.concurrency {
        config.providers.max_concurrency = concurrency;
    }
    let ctx = AppContext::new(config, None)?;
    let mut out = io::stdout().lock();

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            drop(out);
            panorama::tui::run(Arc::new(ctx)).await?;
        }
        Commands::Feed { categories, page } => {
            commands::show_feed(&ctx, &mut out, categories, page).await?;
        }
        Commands::Search { query } => {
            commands::search(&ctx, &mut out, &query).await?;
        }
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::list_categories(&ctx, &mut out)?,
            CategoryAction::Add { name } => commands::add_category(&ctx, &mut out, &name)?,
            CategoryAction::Remove { name } => commands::remove_category(&ctx, &mut out, &name)?,
            CategoryAction::Reset => commands::reset_categories(&ctx, &mut out)?,
        },
        Commands::Theme { theme } => {
            commands::theme(&ctx, &mut out, theme)?;
        }
        Commands::Notifications { state } => {
            commands::set_notifications(&ctx, &mut out, state.enabled())?;
        }
        Commands::Language { tag } => {
            commands::language(&ctx, &mut out, tag.as_deref())?;
        }
        Commands::Favorites { action } => match action {
            FavoriteAction::List => commands::list_favorites(&ctx, &mut out)?,
            FavoriteAction::Add { id } => commands::add_favorite(&ctx, &mut out, &id)?,
            FavoriteAction::Remove { id } => commands::remove_favorite(&ctx, &mut out, &id)?,
        },
        Commands::Prefs { action } => match action.unwrap_or(PrefsAction::Show) {
            PrefsAction::Show => commands::show_preferences(&ctx, &mut out)?,
            PrefsAction::Reset => commands::reset_preferences(&ctx, &mut out)?,
        },
    }

    Ok(())
}
