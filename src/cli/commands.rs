use std::io::Write;

use crate::app::{AppContext, DashboardError, Result};
use crate::domain::{
    is_reserved_category, ContentItem, FavoritesSet, PreferenceSet, Theme, AVAILABLE_CATEGORIES,
};
use crate::store::Store;

pub async fn show_feed<W: Write>(
    ctx: &AppContext,
    out: &mut W,
    categories: Vec<String>,
    page: u32,
) -> Result<()> {
    let categories = if categories.is_empty() {
        ctx.store.load_preferences()?.categories
    } else {
        categories
    };
    let favorites = ctx.store.load_favorites()?;

    let result = ctx.aggregator.aggregate(&categories, page).await?;
    if result.is_empty() {
        writeln!(out, "No items")?;
        return Ok(());
    }

    for item in &result.items {
        write_item(out, item, &favorites)?;
    }
    writeln!(
        out,
        "Page {} ({} items){}",
        result.page,
        result.items.len(),
        if result.has_more { ", more available" } else { "" }
    )?;
    Ok(())
}

pub async fn search<W: Write>(ctx: &AppContext, out: &mut W, query: &str) -> Result<()> {
    let favorites = ctx.store.load_favorites()?;
    let results = ctx.search.search(query).await;

    if results.is_empty() {
        writeln!(out, "No results for \"{}\"", query.trim())?;
        return Ok(());
    }
    for item in &results {
        write_item(out, item, &favorites)?;
    }
    writeln!(out, "{} results", results.len())?;
    Ok(())
}

fn write_item<W: Write>(out: &mut W, item: &ContentItem, favorites: &FavoritesSet) -> Result<()> {
    let marker = if favorites.contains(item.id()) { "*" } else { " " };
    writeln!(
        out,
        "{} {:<7} {:<22} {}",
        marker,
        item.kind(),
        item.id(),
        item.title()
    )?;
    Ok(())
}

pub fn list_categories<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    let prefs = ctx.store.load_preferences()?;
    for category in AVAILABLE_CATEGORIES {
        let mark = if prefs.has_category(category) { "x" } else { " " };
        writeln!(out, "[{}] {}", mark, category)?;
    }
    // Custom labels outside the built-in list.
    for category in prefs
        .categories
        .iter()
        .filter(|c| !AVAILABLE_CATEGORIES.contains(&c.as_str()))
    {
        writeln!(out, "[x] {}", category)?;
    }
    Ok(())
}

pub fn add_category<W: Write>(ctx: &AppContext, out: &mut W, name: &str) -> Result<()> {
    if name.trim().is_empty() || is_reserved_category(name) {
        return Err(DashboardError::InvalidCategory(name.to_string()));
    }
    update_preferences(ctx, |prefs| {
        if prefs.add_category(name) {
            writeln!(out, "Added category: {}", name.trim())
        } else {
            writeln!(out, "Category already selected: {}", name.trim())
        }
    })
}

pub fn remove_category<W: Write>(ctx: &AppContext, out: &mut W, name: &str) -> Result<()> {
    update_preferences(ctx, |prefs| {
        if prefs.remove_category(name) {
            writeln!(out, "Removed category: {}", name.trim())
        } else {
            writeln!(out, "Category not selected: {}", name.trim())
        }
    })
}

pub fn reset_categories<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    update_preferences(ctx, |prefs| {
        prefs.set_categories(PreferenceSet::default().categories);
        writeln!(out, "Categories reset: {}", prefs.categories.join(", "))
    })
}

pub fn theme<W: Write>(ctx: &AppContext, out: &mut W, theme: Option<Theme>) -> Result<()> {
    match theme {
        Some(theme) => update_preferences(ctx, |prefs| {
            prefs.set_theme(theme);
            writeln!(out, "Theme set to {}", theme)
        }),
        None => {
            writeln!(out, "{}", ctx.store.load_preferences()?.theme)?;
            Ok(())
        }
    }
}

pub fn set_notifications<W: Write>(ctx: &AppContext, out: &mut W, enabled: bool) -> Result<()> {
    update_preferences(ctx, |prefs| {
        prefs.set_notifications(enabled);
        writeln!(
            out,
            "Notifications {}",
            if enabled { "enabled" } else { "disabled" }
        )
    })
}

pub fn language<W: Write>(ctx: &AppContext, out: &mut W, tag: Option<&str>) -> Result<()> {
    match tag.map(str::trim) {
        Some("") => Err(DashboardError::Other("Language tag must not be empty".into())),
        Some(tag) => update_preferences(ctx, |prefs| {
            prefs.set_language(tag);
            writeln!(out, "Language set to {}", tag)
        }),
        None => {
            writeln!(out, "{}", ctx.store.load_preferences()?.language)?;
            Ok(())
        }
    }
}

pub fn show_preferences<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    let prefs = ctx.store.load_preferences()?;
    writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
    Ok(())
}

/// Restore every preference to its default. Favorites are kept.
pub fn reset_preferences<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    update_preferences(ctx, |prefs| {
        prefs.reset();
        writeln!(out, "Preferences reset to defaults")
    })
}

pub fn list_favorites<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    let favorites = ctx.store.load_favorites()?;
    if favorites.is_empty() {
        writeln!(out, "No favorites")?;
        return Ok(());
    }
    for id in favorites.iter() {
        writeln!(out, "{}", id)?;
    }
    Ok(())
}

pub fn add_favorite<W: Write>(ctx: &AppContext, out: &mut W, id: &str) -> Result<()> {
    if ctx.store.add_favorite(id)? {
        writeln!(out, "Added favorite: {}", id)?;
    } else {
        writeln!(out, "Already a favorite: {}", id)?;
    }
    Ok(())
}

pub fn remove_favorite<W: Write>(ctx: &AppContext, out: &mut W, id: &str) -> Result<()> {
    if ctx.store.remove_favorite(id)? {
        writeln!(out, "Removed favorite: {}", id)?;
    } else {
        writeln!(out, "Not a favorite: {}", id)?;
    }
    Ok(())
}

/// Load, mutate and save the preferences in one step.
fn update_preferences<F>(ctx: &AppContext, change: F) -> Result<()>
where
    F: FnOnce(&mut PreferenceSet) -> std::io::Result<()>,
{
    let mut prefs = ctx.store.load_preferences()?;
    change(&mut prefs)?;
    ctx.store.save_preferences(&prefs)?;
    Ok(())
}
