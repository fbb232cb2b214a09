use std::time::{Duration, Instant};

use crate::app::Result;
use crate::domain::{ContentItem, ContentKind};
use crate::engine::bounded;
use crate::provider::ProviderGateway;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Free-text search across all three providers.
///
/// Unlike aggregation, a failing source only removes its own contribution.
#[derive(Clone)]
pub struct SearchEngine {
    gateway: ProviderGateway,
    timeout: Duration,
}

impl SearchEngine {
    pub fn new(gateway: ProviderGateway, timeout: Duration) -> Self {
        Self { gateway, timeout }
    }

    pub async fn search(&self, query: &str) -> Vec<ContentItem> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        let hashtags = vec![query.to_string()];

        let (articles, movies, posts) = tokio::join!(
            bounded(
                ContentKind::Article,
                self.timeout,
                self.gateway.articles.fetch_articles(query, 1),
            ),
            bounded(
                ContentKind::Movie,
                self.timeout,
                self.gateway.movies.fetch_movies(1),
            ),
            bounded(
                ContentKind::Post,
                self.timeout,
                self.gateway.posts.fetch_posts(&hashtags, 1),
            ),
        );

        let articles = or_empty(ContentKind::Article, articles.map(|p| p.articles));
        let movies = or_empty(ContentKind::Movie, movies.map(|p| p.movies));
        let posts = or_empty(ContentKind::Post, posts.map(|p| p.posts));

        let movies = movies.into_iter().filter(|m| {
            m.title.to_lowercase().contains(&needle) || m.overview.to_lowercase().contains(&needle)
        });
        let posts = posts.into_iter().filter(|p| {
            p.content.to_lowercase().contains(&needle)
                || p.hashtags.iter().any(|t| t.to_lowercase().contains(&needle))
        });

        let mut results = Vec::new();
        results.extend(stamp(articles.into_iter().map(ContentItem::Article)));
        results.extend(stamp(movies.map(ContentItem::Movie)));
        results.extend(stamp(posts.map(ContentItem::Post)));

        tracing::info!(query, results = results.len(), "Search finished");
        results
    }
}

fn or_empty<T>(kind: ContentKind, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(%kind, error = %e, "Search source failed, skipping it");
        Vec::new()
    })
}

fn stamp(items: impl Iterator<Item = ContentItem>) -> impl Iterator<Item = ContentItem> {
    items.enumerate().map(|(i, item)| {
        let id = format!("{}-{}", item.kind().search_prefix(), i);
        item.with_id(id)
    })
}

/// Accepted search request; hand it back to [`SearchController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub query: String,
    seq: u64,
}

/// Search state kept apart from the main feed.
///
/// A newer query supersedes an older one; results for the older query are
/// dropped when they arrive.
#[derive(Debug, Default)]
pub struct SearchController {
    query: String,
    results: Vec<ContentItem>,
    loading: bool,
    error: Option<String>,
    in_flight: Option<u64>,
    next_seq: u64,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[ContentItem] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a search is active (non-blank query).
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Set the query. A blank query clears the results and yields no ticket.
    pub fn set_query(&mut self, text: &str) -> Option<SearchTicket> {
        if text.trim().is_empty() {
            self.clear();
            return None;
        }
        self.query = text.to_string();
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        self.loading = true;
        self.error = None;
        Some(SearchTicket {
            query: self.query.clone(),
            seq: self.next_seq,
        })
    }

    pub fn complete(&mut self, ticket: &SearchTicket, results: Vec<ContentItem>) -> bool {
        if self.in_flight != Some(ticket.seq) {
            tracing::debug!(query = %ticket.query, "Ignoring superseded search results");
            return false;
        }
        self.results = results;
        self.loading = false;
        self.in_flight = None;
        true
    }

    pub fn fail(&mut self, ticket: &SearchTicket, message: impl Into<String>) -> bool {
        if self.in_flight != Some(ticket.seq) {
            return false;
        }
        self.error = Some(message.into());
        self.loading = false;
        self.in_flight = None;
        true
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
        self.loading = false;
        self.error = None;
        self.in_flight = None;
    }

    /// Set the query and run the search inline.
    pub async fn search(&mut self, engine: &SearchEngine, text: &str) -> &[ContentItem] {
        if let Some(ticket) = self.set_query(text) {
            let results = engine.search(&ticket.query).await;
            self.complete(&ticket, results);
        }
        &self.results
    }
}

/// Holds the latest input until it has been quiet for `delay`.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now + self.delay));
    }

    /// Take the pending input once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, due)) if *due <= now => self.pending.take().map(|(text, _)| text),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
