use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::{ColorConfig, ThemeColors};
use crate::domain::{ContentItem, ContentKind};
use crate::notify::NotificationLevel;
use crate::tui::app::{ActivePane, SidebarRow, TuiApp};

const SIDEBAR_WIDTH: u16 = 26;
const TOAST_WIDTH: u16 = 44;

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ThemeColors) {
    let colors = colors.palette(app.prefs.theme);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Min(6)])
        .split(columns[1]);

    render_sidebar(frame, app, columns[0], colors);
    render_feed_pane(frame, app, right[0], colors);
    render_detail_pane(frame, app, right[1], colors);
    render_status_bar(frame, app, rows[1], colors);
    render_notifications(frame, app, rows[0], colors);
}

fn pane_block(title: String, active: bool, colors: &ColorConfig) -> Block<'static> {
    let border = if active {
        colors.active_border
    } else {
        colors.inactive_border
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

fn highlight(active: bool, colors: &ColorConfig) -> Style {
    if active {
        Style::default()
            .bg(colors.selection_bg_active)
            .fg(colors.selection_fg_active)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(colors.selection_bg_inactive)
            .fg(colors.selection_fg_inactive)
    }
}

fn render_sidebar(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let is_active = app.active_pane == ActivePane::Sidebar;

    let items: Vec<ListItem> = app
        .sidebar_rows()
        .into_iter()
        .map(|row| match row {
            SidebarRow::Category { name, selected } => {
                let mark = if selected { "[x]" } else { "[ ]" };
                let style = if selected {
                    Style::default().fg(colors.text)
                } else {
                    Style::default().fg(colors.muted)
                };
                ListItem::new(format!("{} {}", mark, name)).style(style)
            }
            SidebarRow::Theme(theme) => {
                ListItem::new(format!("Theme: {}", theme)).style(Style::default().fg(colors.muted))
            }
            SidebarRow::Notifications(on) => ListItem::new(format!(
                "Notifications: {}",
                if on { "on" } else { "off" }
            ))
            .style(Style::default().fg(colors.muted)),
        })
        .collect();

    let list = List::new(items)
        .block(pane_block(" Categories ".to_string(), is_active, colors))
        .highlight_style(highlight(is_active, colors))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.sidebar_list_state);
}

fn kind_color(kind: ContentKind, colors: &ColorConfig) -> Color {
    match kind {
        ContentKind::Article => colors.article,
        ContentKind::Movie => colors.movie,
        ContentKind::Post => colors.post,
    }
}

fn render_feed_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let is_active = app.active_pane == ActivePane::Feed;
    let visible = app.visible_items();

    let items: Vec<ListItem> = visible
        .iter()
        .map(|item| {
            let marker = if app.is_favorite(item) {
                Span::styled("♥ ", Style::default().fg(colors.favorite))
            } else {
                Span::raw("  ")
            };
            let badge = Span::styled(
                format!("{:<8}", item.kind().to_string()),
                Style::default().fg(kind_color(item.kind(), colors)),
            );
            let title = Span::styled(item.title().to_string(), Style::default().fg(colors.text));
            ListItem::new(Line::from(vec![marker, badge, title]))
        })
        .collect();

    let view = if app.search.is_active() {
        format!("Search \"{}\"", app.search.query().trim())
    } else {
        "Feed".to_string()
    };
    let mut title = format!(
        " {}{} ({}) [{}/{}] ",
        view,
        if app.favorites_only { " - favorites" } else { "" },
        visible.len(),
        app.feed_index + 1,
        visible.len().max(1)
    );
    if app.pager.is_loading() || app.search.is_loading() {
        title.push_str("loading... ");
    }

    let list = List::new(items)
        .block(pane_block(title, is_active, colors))
        .highlight_style(highlight(is_active, colors))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.feed_list_state);
}

fn detail_lines(item: &ContentItem, colors: &ColorConfig) -> Vec<Line<'static>> {
    let meta = Style::default().fg(colors.muted);
    let mut lines = vec![
        Line::from(Span::styled(
            item.title().to_string(),
            Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match item {
        ContentItem::Article(a) => {
            lines.push(Line::from(Span::styled(
                format!("{} | {}", a.source_name, a.category),
                meta,
            )));
        }
        ContentItem::Movie(m) => {
            lines.push(Line::from(Span::styled(
                format!("Released {} | Rating {:.1}", m.release_date, m.vote_average),
                meta,
            )));
            if let Some(poster) = m.poster_url() {
                lines.push(Line::from(Span::styled(format!("Poster: {}", poster), meta)));
            }
        }
        ContentItem::Post(p) => {
            lines.push(Line::from(Span::styled(
                format!("{} likes | {} shares", p.likes, p.shares),
                meta,
            )));
            if !p.hashtags.is_empty() {
                let tags: Vec<String> = p.hashtags.iter().map(|t| format!("#{}", t)).collect();
                lines.push(Line::from(Span::styled(
                    tags.join(" "),
                    Style::default().fg(colors.post),
                )));
            }
        }
    }

    if let Some(ts) = item.timestamp() {
        lines.push(Line::from(Span::styled(
            format!("Date: {}", ts.format("%Y-%m-%d %H:%M")),
            meta,
        )));
    }
    if let Some(link) = item.link() {
        lines.push(Line::from(Span::styled(
            format!("Link: {}", link),
            Style::default().fg(colors.link),
        )));
    }
    lines.push(Line::from(""));
    for line in item.summary().lines() {
        lines.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(colors.text),
        )));
    }
    lines
}

fn render_detail_pane(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let is_active = app.active_pane == ActivePane::Detail;

    let content = match app.selected_item() {
        Some(item) => Text::from(detail_lines(item, colors)),
        None if app.pager.error().is_some() && app.visible_items().is_empty() => {
            Text::from("Could not load content. Press R to retry.")
        }
        None => Text::from("No item selected"),
    };

    let paragraph = Paragraph::new(content)
        .block(pane_block(" Detail ".to_string(), is_active, colors))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let status = if let Some(prompt) = &app.account {
        format!("{} (Enter:next  Esc:cancel)", prompt.display())
    } else if let Some(input) = &app.search_input {
        format!("/{}", input)
    } else if let Some(msg) = &app.status_message {
        msg.clone()
    } else if let Some(err) = app.pager.error() {
        format!("Error: {} (R to retry)", err)
    } else {
        "j/k:Nav  Tab:Pane  Space:Toggle  f:Fav  F:Favs  o:Open  /:Search  t:Theme  N:Notify  R:Reload  L:Login  q:Quit"
            .to_string()
    };

    let status = match app.auth.user() {
        Some(user) if app.account.is_none() => format!("[{}] {}", user.name, status),
        _ => status,
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}

fn level_color(level: NotificationLevel, colors: &ColorConfig) -> Color {
    match level {
        NotificationLevel::Success => colors.success,
        NotificationLevel::Error => colors.error,
        NotificationLevel::Info => colors.info,
        NotificationLevel::Warning => colors.warning,
    }
}

/// Stack active notifications in the top-right corner, newest at the bottom.
fn render_notifications(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y + 1;

    for notification in app.notifications.active() {
        let height = if notification.message.is_empty() { 3 } else { 4 };
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + area.width - width, y, width, height);
        let color = level_color(notification.level, colors);

        let mut lines = vec![Line::from(Span::styled(
            notification.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if !notification.message.is_empty() {
            lines.push(Line::from(notification.message.clone()));
        }

        let toast = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(Clear, rect);
        frame.render_widget(toast, rect);
        y += height;
    }
}
