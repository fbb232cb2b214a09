use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::app::{DashboardError, Result};
use crate::domain::{is_reserved_category, AggregationResult, ContentItem, ContentKind};
use crate::engine::bounded;
use crate::provider::ProviderGateway;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Fans one page out to every provider and merges the results.
///
/// Output order is fixed: articles grouped by category in input order, then
/// movies, then posts. Category requests may overlap, but results are
/// merged by input position, never by completion order.
#[derive(Clone)]
pub struct Aggregator {
    gateway: ProviderGateway,
    timeout: Duration,
    concurrency: usize,
}

impl Aggregator {
    pub fn new(gateway: ProviderGateway, timeout: Duration) -> Self {
        Self {
            gateway,
            timeout,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn gateway(&self) -> &ProviderGateway {
        &self.gateway
    }

    /// Aggregate one page. Any provider error fails the whole page.
    pub async fn aggregate(&self, categories: &[String], page: u32) -> Result<AggregationResult> {
        let categories = effective_categories(categories);
        self.collect(&categories, page)
            .await
            .map_err(|e| DashboardError::aggregation(page, e))
    }

    async fn collect(&self, categories: &[String], page: u32) -> Result<AggregationResult> {
        let requests: Vec<_> = categories
            .iter()
            .map(|c| self.fetch_category(c, page))
            .collect();
        let articles = stream::iter(requests)
            .buffered(self.concurrency)
            .try_collect::<Vec<_>>();

        let movies = bounded(
            ContentKind::Movie,
            self.timeout,
            self.gateway.movies.fetch_movies(page),
        );

        let posts = bounded(
            ContentKind::Post,
            self.timeout,
            self.gateway.posts.fetch_posts(categories, page),
        );

        let (articles, movies, posts) = tokio::try_join!(articles, movies, posts)?;

        let has_more = movies.total_pages > page;
        let mut items: Vec<ContentItem> = articles.into_iter().flatten().collect();
        items.extend(movies.movies.into_iter().enumerate().map(|(i, m)| {
            ContentItem::Movie(m).with_id(format!("movie-{}-{}", page, i))
        }));
        items.extend(posts.posts.into_iter().enumerate().map(|(i, p)| {
            ContentItem::Post(p).with_id(format!("social-{}-{}", page, i))
        }));

        tracing::info!(
            page,
            items = items.len(),
            has_more,
            "Aggregated page"
        );

        Ok(AggregationResult {
            items,
            has_more,
            page,
        })
    }

    async fn fetch_category(&self, category: &str, page: u32) -> Result<Vec<ContentItem>> {
        let response = bounded(
            ContentKind::Article,
            self.timeout,
            self.gateway.articles.fetch_articles(category, page),
        )
        .await?;

        Ok(response
            .articles
            .into_iter()
            .enumerate()
            .map(|(i, mut article)| {
                article.category = category.to_string();
                ContentItem::Article(article).with_id(format!("{}-{}-{}", category, page, i))
            })
            .collect())
    }
}

/// Drop blank, duplicate and reserved labels, keeping first-seen order.
fn effective_categories(categories: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(categories.len());
    for category in categories {
        let category = category.trim();
        if category.is_empty() {
            continue;
        }
        if is_reserved_category(category) {
            tracing::warn!(category, "Skipping reserved category label");
            continue;
        }
        if seen.insert(category.to_string()) {
            out.push(category.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::provider::testing::{FakeArticles, FakeMovies, FakePosts, Fakes};

    fn cats(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn aggregator(fakes: &Fakes) -> Aggregator {
        Aggregator::new(fakes.gateway(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_sections_in_fixed_order() {
        let articles = FakeArticles::default();
        // The first category completes last.
        articles
            .delays
            .lock()
            .unwrap()
            .push(("sports".into(), Duration::from_millis(30)));
        let fakes = Fakes::with(articles, FakeMovies::default(), FakePosts::default());

        let result = aggregator(&fakes)
            .aggregate(&cats(&["sports", "technology"]), 1)
            .await
            .unwrap();

        let kinds: Vec<ContentKind> = result.items.iter().map(|i| i.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ContentKind::Article,
                ContentKind::Article,
                ContentKind::Article,
                ContentKind::Article,
                ContentKind::Movie,
                ContentKind::Movie,
                ContentKind::Post,
                ContentKind::Post,
                ContentKind::Post,
            ]
        );

        let ids: Vec<&str> = result.items.iter().map(|i| i.id()).collect();
        assert_eq!(
            ids,
            vec![
                "sports-1-0",
                "sports-1-1",
                "technology-1-0",
                "technology-1-1",
                "movie-1-0",
                "movie-1-1",
                "social-1-0",
                "social-1-1",
                "social-1-2",
            ]
        );
    }

    #[tokio::test]
    async fn test_ids_unique_within_page() {
        let fakes = Fakes::new();
        let result = aggregator(&fakes)
            .aggregate(&cats(&["technology", "sports", "business", "health"]), 3)
            .await
            .unwrap();

        let ids: HashSet<&str> = result.items.iter().map(|i| i.id()).collect();
        assert_eq!(ids.len(), result.items.len());
        assert_eq!(result.page, 3);
    }

    #[tokio::test]
    async fn test_articles_tagged_with_category() {
        let fakes = Fakes::new();
        let result = aggregator(&fakes)
            .aggregate(&cats(&["business"]), 1)
            .await
            .unwrap();

        match &result.items[0] {
            ContentItem::Article(a) => assert_eq!(a.category, "business"),
            other => panic!("expected article, got {:?}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_has_more_follows_total_pages() {
        let fakes = Fakes::new();
        let agg = aggregator(&fakes);
        let categories = cats(&["sports"]);

        assert!(agg.aggregate(&categories, 1).await.unwrap().has_more);
        assert!(agg.aggregate(&categories, 9).await.unwrap().has_more);
        assert!(!agg.aggregate(&categories, 10).await.unwrap().has_more);
        assert!(!agg.aggregate(&categories, 11).await.unwrap().has_more);
    }

    #[tokio::test]
    async fn test_article_failure_fails_whole_page() {
        let fakes = Fakes::new();
        fakes.articles.fail_on("sports");

        let err = aggregator(&fakes)
            .aggregate(&cats(&["technology", "sports"]), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, DashboardError::Aggregation { page: 1, .. }));
        assert_eq!(err.provider(), Some(ContentKind::Article));
    }

    #[tokio::test]
    async fn test_movie_failure_fails_whole_page() {
        let fakes = Fakes::with(
            FakeArticles::default(),
            FakeMovies {
                fail: true,
                ..Default::default()
            },
            FakePosts::default(),
        );
        let err = aggregator(&fakes)
            .aggregate(&cats(&["sports"]), 2)
            .await
            .unwrap_err();
        assert_eq!(err.provider(), Some(ContentKind::Movie));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out() {
        let fakes = Fakes::with(
            FakeArticles::default(),
            FakeMovies {
                hang: true,
                ..Default::default()
            },
            FakePosts::default(),
        );
        let err = aggregator(&fakes)
            .aggregate(&cats(&["sports"]), 1)
            .await
            .unwrap_err();

        match err {
            DashboardError::Aggregation { source, .. } => {
                assert!(matches!(
                    *source,
                    DashboardError::Timeout {
                        kind: ContentKind::Movie,
                        ..
                    }
                ));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_and_reserved_categories_skipped() {
        let fakes = Fakes::new();
        let result = aggregator(&fakes)
            .aggregate(&cats(&["sports", "sports", " ", "movie", "social"]), 1)
            .await
            .unwrap();

        assert_eq!(fakes.articles.calls(), 1);
        let articles = result
            .items
            .iter()
            .filter(|i| i.kind() == ContentKind::Article)
            .count();
        assert_eq!(articles, 2);
    }

    #[tokio::test]
    async fn test_posts_requested_with_categories_as_hashtags() {
        let fakes = Fakes::new();
        aggregator(&fakes)
            .aggregate(&cats(&["science", "health"]), 1)
            .await
            .unwrap();
        assert_eq!(
            *fakes.posts.last_hashtags.lock().unwrap(),
            vec!["science".to_string(), "health".to_string()]
        );
    }

    #[tokio::test]
    async fn test_no_categories_still_loads_movies_and_posts() {
        let fakes = Fakes::new();
        let result = aggregator(&fakes).aggregate(&[], 1).await.unwrap();
        assert_eq!(fakes.articles.calls(), 0);
        assert_eq!(result.items.len(), 5);
    }

    #[tokio::test]
    async fn test_serial_concurrency_preserves_order() {
        let fakes = Fakes::new();
        let agg = Aggregator::new(fakes.gateway(), Duration::from_secs(5)).with_concurrency(1);
        let result = agg.aggregate(&cats(&["b", "a"]), 1).await.unwrap();
        assert_eq!(result.items[0].id(), "b-1-0");
        assert_eq!(result.items[2].id(), "a-1-0");
    }
}
