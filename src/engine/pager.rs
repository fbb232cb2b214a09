use crate::app::{DashboardError, Result};
use crate::domain::{AggregationResult, ContentItem};
use crate::engine::Aggregator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    LoadingInitial,
    LoadingMore,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Result replaces the collection.
    Initial,
    /// Result is appended to the collection.
    More,
}

/// An accepted load request. Hand it back to [`Pager::complete`] together
/// with the aggregation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub kind: LoadKind,
    pub page: u32,
    pub categories: Vec<String>,
    seq: u64,
}

/// Owns the accumulated feed and drives page-by-page loading.
///
/// At most one load is in flight: requests that arrive while one is
/// outstanding are dropped, not queued. Splitting `request_*` from
/// `complete` lets the caller run the aggregation on another task while the
/// pager stays single-owner.
#[derive(Debug)]
pub struct Pager {
    state: LoadState,
    items: Vec<ContentItem>,
    page: u32,
    has_more: bool,
    error: Option<String>,
    categories: Option<Vec<String>>,
    in_flight: Option<u64>,
    next_seq: u64,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pager {
    pub fn new() -> Self {
        Self {
            state: LoadState::Idle,
            items: Vec::new(),
            page: 1,
            has_more: true,
            error: None,
            categories: None,
            in_flight: None,
            next_seq: 0,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::LoadingInitial | LoadState::LoadingMore)
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Categories of the most recent initial load.
    pub fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    /// Start loading page 1 for `categories`.
    ///
    /// Accepted from `Idle` or `Error`; `None` while a load is in flight.
    pub fn request_initial_load(&mut self, categories: Vec<String>) -> Option<LoadTicket> {
        if self.is_loading() {
            tracing::debug!("Initial load dropped, a load is already in flight");
            return None;
        }
        self.categories = Some(categories.clone());
        Some(self.begin(LoadKind::Initial, 1, categories))
    }

    /// Start loading the page after the current one.
    ///
    /// From `Error` this restarts with a fresh initial load of the last
    /// categories. Otherwise it needs `Idle` and `has_more`.
    pub fn request_more(&mut self) -> Option<LoadTicket> {
        let categories = self.categories.clone()?;
        match self.state {
            LoadState::Error => Some(self.begin(LoadKind::Initial, 1, categories)),
            LoadState::Idle if self.has_more => {
                let next = self.page + 1;
                Some(self.begin(LoadKind::More, next, categories))
            }
            _ => None,
        }
    }

    fn begin(&mut self, kind: LoadKind, page: u32, categories: Vec<String>) -> LoadTicket {
        self.next_seq += 1;
        self.in_flight = Some(self.next_seq);
        self.state = match kind {
            LoadKind::Initial => LoadState::LoadingInitial,
            LoadKind::More => LoadState::LoadingMore,
        };
        tracing::debug!(?kind, page, "Load started");
        LoadTicket {
            kind,
            page,
            categories,
            seq: self.next_seq,
        }
    }

    /// Apply the outcome of a load. Returns `false` for a ticket that is no
    /// longer current (superseded or cleared), which is ignored.
    pub fn complete(&mut self, ticket: &LoadTicket, result: Result<AggregationResult>) -> bool {
        match result {
            Ok(page) => self.finish(ticket, page),
            Err(e) => self.fail(ticket, &e),
        }
    }

    fn finish(&mut self, ticket: &LoadTicket, result: AggregationResult) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match ticket.kind {
            LoadKind::Initial => self.items = result.items,
            LoadKind::More => self.items.extend(result.items),
        }
        self.page = result.page;
        self.has_more = result.has_more;
        self.error = None;
        self.state = LoadState::Idle;
        self.in_flight = None;
        true
    }

    /// Record a failed load. Already loaded items are kept.
    pub fn fail(&mut self, ticket: &LoadTicket, error: &DashboardError) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        tracing::error!(page = ticket.page, error = %error, "Load failed");
        self.error = Some(error.to_string());
        self.state = LoadState::Error;
        self.in_flight = None;
        true
    }

    fn is_current(&self, ticket: &LoadTicket) -> bool {
        let current = self.in_flight == Some(ticket.seq);
        if !current {
            tracing::debug!(page = ticket.page, "Ignoring stale load result");
        }
        current
    }

    /// Empty the collection and forget any in-flight load.
    pub fn clear(&mut self) {
        self.items.clear();
        self.page = 1;
        self.has_more = true;
        self.error = None;
        self.state = LoadState::Idle;
        self.in_flight = None;
    }

    /// Load page 1 inline. `Ok(false)` if the request was dropped.
    pub async fn load_initial(
        &mut self,
        aggregator: &Aggregator,
        categories: Vec<String>,
    ) -> Result<bool> {
        match self.request_initial_load(categories) {
            Some(ticket) => self.run(aggregator, ticket).await,
            None => Ok(false),
        }
    }

    /// Load the next page inline. `Ok(false)` if there was nothing to do.
    pub async fn load_more(&mut self, aggregator: &Aggregator) -> Result<bool> {
        match self.request_more() {
            Some(ticket) => self.run(aggregator, ticket).await,
            None => Ok(false),
        }
    }

    async fn run(&mut self, aggregator: &Aggregator, ticket: LoadTicket) -> Result<bool> {
        match aggregator.aggregate(&ticket.categories, ticket.page).await {
            Ok(page) => Ok(self.finish(&ticket, page)),
            Err(e) => {
                self.fail(&ticket, &e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::provider::testing::{FakeArticles, FakeMovies, FakePosts, Fakes};

    fn cats(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn aggregator(fakes: &Fakes) -> Aggregator {
        Aggregator::new(fakes.gateway(), Duration::from_secs(5))
    }

    fn ids(pager: &Pager) -> Vec<String> {
        pager.items().iter().map(|i| i.id().to_string()).collect()
    }

    #[tokio::test]
    async fn test_initial_load_replaces_collection() {
        let fakes = Fakes::new();
        let agg = aggregator(&fakes);
        let mut pager = Pager::new();

        assert!(assert_ok!(pager.load_initial(&agg, cats(&["sports"])).await));
        assert_eq!(pager.state(), LoadState::Idle);
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.items().len(), 7);

        assert_ok!(pager.load_initial(&agg, cats(&["health"])).await);
        assert_eq!(pager.items().len(), 7);
        assert_eq!(pager.items()[0].id(), "health-1-0");
    }

    #[tokio::test]
    async fn test_load_more_appends() {
        let fakes = Fakes::new();
        let agg = aggregator(&fakes);
        let mut pager = Pager::new();

        assert_ok!(pager.load_initial(&agg, cats(&["sports"])).await);
        assert!(assert_ok!(pager.load_more(&agg).await));

        assert_eq!(pager.page(), 2);
        assert_eq!(pager.items().len(), 14);
        let ids = ids(&pager);
        assert_eq!(ids[0], "sports-1-0");
        assert_eq!(ids[7], "sports-2-0");
    }

    #[tokio::test]
    async fn test_load_more_without_more_pages_is_noop() {
        let fakes = Fakes::with(
            FakeArticles::default(),
            FakeMovies {
                total_pages: 1,
                ..Default::default()
            },
            FakePosts::default(),
        );
        let agg = aggregator(&fakes);
        let mut pager = Pager::new();

        assert_ok!(pager.load_initial(&agg, cats(&["sports"])).await);
        assert!(!pager.has_more());
        let before = ids(&pager);
        let calls = fakes.total_calls();

        assert!(!assert_ok!(pager.load_more(&agg).await));
        assert_eq!(ids(&pager), before);
        assert_eq!(fakes.total_calls(), calls);
    }

    #[test]
    fn test_requests_dropped_while_loading() {
        let mut pager = Pager::new();
        let ticket = pager.request_initial_load(cats(&["sports"])).unwrap();
        assert_eq!(pager.state(), LoadState::LoadingInitial);

        assert!(pager.request_more().is_none());
        assert!(pager.request_initial_load(cats(&["health"])).is_none());
        assert!(pager.items().is_empty());

        let result = AggregationResult {
            items: Vec::new(),
            has_more: true,
            page: 1,
        };
        assert!(pager.complete(&ticket, Ok(result)));
        assert_eq!(pager.state(), LoadState::Idle);

        let more = pager.request_more().unwrap();
        assert_eq!(more.kind, LoadKind::More);
        assert_eq!(more.page, 2);
        assert_eq!(pager.state(), LoadState::LoadingMore);
        assert!(pager.request_more().is_none());
    }

    #[test]
    fn test_request_more_before_any_load() {
        let mut pager = Pager::new();
        assert!(pager.request_more().is_none());
        assert_eq!(pager.state(), LoadState::Idle);
    }

    #[tokio::test]
    async fn test_failure_keeps_last_good_collection() {
        let fakes = Fakes::new();
        let agg = aggregator(&fakes);
        let mut pager = Pager::new();

        assert_ok!(pager.load_initial(&agg, cats(&["technology", "sports"])).await);
        let before = ids(&pager);

        fakes.articles.fail_on("sports");
        let err = assert_err!(pager.load_initial(&agg, cats(&["technology", "sports"])).await);
        assert!(matches!(err, DashboardError::Aggregation { .. }));

        assert_eq!(pager.state(), LoadState::Error);
        assert!(pager.error().unwrap().contains("sports"));
        assert_eq!(ids(&pager), before);
    }

    #[tokio::test]
    async fn test_more_after_error_restarts_initial_load() {
        let fakes = Fakes::new();
        let agg = aggregator(&fakes);
        let mut pager = Pager::new();

        assert_ok!(pager.load_initial(&agg, cats(&["sports"])).await);
        assert_ok!(pager.load_more(&agg).await);
        assert_eq!(pager.items().len(), 14);

        fakes.articles.fail_on("sports");
        assert_err!(pager.load_more(&agg).await);
        assert_eq!(pager.items().len(), 14);

        fakes.articles.heal();
        let ticket = pager.request_more().unwrap();
        assert_eq!(ticket.kind, LoadKind::Initial);
        assert_eq!(ticket.page, 1);

        let result = agg.aggregate(&ticket.categories, ticket.page).await;
        assert!(pager.complete(&ticket, result));
        assert_eq!(pager.state(), LoadState::Idle);
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.items().len(), 7);
        assert!(pager.error().is_none());
    }

    #[test]
    fn test_stale_ticket_ignored_after_clear() {
        let mut pager = Pager::new();
        let ticket = pager.request_initial_load(cats(&["sports"])).unwrap();
        pager.clear();

        let late = AggregationResult {
            items: Vec::new(),
            has_more: false,
            page: 1,
        };
        assert!(!pager.complete(&ticket, Ok(late)));
        assert!(pager.has_more());
        assert_eq!(pager.state(), LoadState::Idle);
    }
}
