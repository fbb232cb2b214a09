//! Provider gateway: uniform async access to the three content sources.

pub mod config;
pub mod news;
pub mod placeholder;
pub mod social;
pub mod tmdb;

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::{Article, Movie, Post};

pub use config::ProviderConfig;
pub use news::NewsApiClient;
pub use social::MockSocialSource;
pub use tmdb::TmdbClient;

#[derive(Debug, Clone, Default)]
pub struct ArticlePage {
    pub total_results: u32,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Default)]
pub struct MoviePage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub total: u32,
    pub posts: Vec<Post>,
}

/// Articles matching a category (used as free-text query upstream).
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_articles(&self, category: &str, page: u32) -> Result<ArticlePage>;
}

/// Paginated popular movie listings.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn fetch_movies(&self, page: u32) -> Result<MoviePage>;
}

/// Social posts filtered by hashtags.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch_posts(&self, hashtags: &[String], page: u32) -> Result<PostPage>;
}

/// The three sources the dashboard aggregates.
#[derive(Clone)]
pub struct ProviderGateway {
    pub articles: Arc<dyn ArticleSource>,
    pub movies: Arc<dyn MovieSource>,
    pub posts: Arc<dyn PostSource>,
}

impl ProviderGateway {
    pub fn new(
        articles: Arc<dyn ArticleSource>,
        movies: Arc<dyn MovieSource>,
        posts: Arc<dyn PostSource>,
    ) -> Self {
        Self {
            articles,
            movies,
            posts,
        }
    }

    /// Gateway backed by NewsAPI, TMDB and the simulated social feed.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(
            Arc::new(NewsApiClient::new(config)?),
            Arc::new(TmdbClient::new(config)?),
            Arc::new(MockSocialSource::new(config.social_latency())),
        ))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-process sources for exercising the engine without a network.

    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::app::DashboardError;
    use crate::domain::item::fixtures;
    use crate::domain::ContentKind;

    #[derive(Default)]
    pub struct FakeArticles {
        pub calls: AtomicUsize,
        pub failing: Mutex<HashSet<String>>,
        /// Per-category delay, to shuffle completion order.
        pub delays: Mutex<Vec<(String, Duration)>>,
    }

    impl FakeArticles {
        pub fn fail_on(&self, category: &str) {
            self.failing.lock().unwrap().insert(category.to_string());
        }

        pub fn heal(&self) {
            self.failing.lock().unwrap().clear();
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ArticleSource for FakeArticles {
        async fn fetch_articles(&self, category: &str, _page: u32) -> Result<ArticlePage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self
                .delays
                .lock()
                .unwrap()
                .iter()
                .find(|(c, _)| c == category)
                .map(|(_, d)| *d);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.lock().unwrap().contains(category) {
                return Err(DashboardError::Upstream {
                    kind: ContentKind::Article,
                    message: format!("{} is down", category),
                });
            }
            Ok(ArticlePage {
                total_results: 2,
                articles: vec![
                    fixtures::article(category, &format!("{} one", category)),
                    fixtures::article(category, &format!("{} two", category)),
                ],
            })
        }
    }

    pub struct FakeMovies {
        pub calls: AtomicUsize,
        pub total_pages: u32,
        pub fail: bool,
        pub hang: bool,
    }

    impl Default for FakeMovies {
        fn default() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                total_pages: 10,
                fail: false,
                hang: false,
            }
        }
    }

    impl FakeMovies {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MovieSource for FakeMovies {
        async fn fetch_movies(&self, page: u32) -> Result<MoviePage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                futures::future::pending::<()>().await;
            }
            if self.fail {
                return Err(DashboardError::Upstream {
                    kind: ContentKind::Movie,
                    message: "tmdb is down".into(),
                });
            }
            Ok(MoviePage {
                page,
                total_pages: self.total_pages,
                total_results: self.total_pages * 2,
                movies: vec![
                    fixtures::movie(1, "The Dragon's Lair", "A knight and a cave."),
                    fixtures::movie(2, "Ocean Deep", "Submarines and silence."),
                ],
            })
        }
    }

    #[derive(Default)]
    pub struct FakePosts {
        pub calls: AtomicUsize,
        pub fail: bool,
        pub last_hashtags: Mutex<Vec<String>>,
    }

    impl FakePosts {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PostSource for FakePosts {
        async fn fetch_posts(&self, hashtags: &[String], _page: u32) -> Result<PostPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_hashtags.lock().unwrap() = hashtags.to_vec();
            if self.fail {
                return Err(DashboardError::Upstream {
                    kind: ContentKind::Post,
                    message: "social is down".into(),
                });
            }
            Ok(PostPage {
                total: 3,
                posts: vec![
                    fixtures::post("Dragons spotted over the bay", &["news"]),
                    fixtures::post("Quiet day at the office", &["work", "DragonBoat"]),
                    fixtures::post("Nothing to see", &["misc"]),
                ],
            })
        }
    }

    /// Local HTTP upstream answering every request with `status` and `body`.
    /// Returns its base URL and a count of the requests it served.
    pub async fn upstream(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let served = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                served.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    pub struct Fakes {
        pub articles: Arc<FakeArticles>,
        pub movies: Arc<FakeMovies>,
        pub posts: Arc<FakePosts>,
    }

    impl Fakes {
        pub fn new() -> Self {
            Self::with(FakeArticles::default(), FakeMovies::default(), FakePosts::default())
        }

        pub fn with(articles: FakeArticles, movies: FakeMovies, posts: FakePosts) -> Self {
            Self {
                articles: Arc::new(articles),
                movies: Arc::new(movies),
                posts: Arc::new(posts),
            }
        }

        pub fn gateway(&self) -> ProviderGateway {
            ProviderGateway::new(
                self.articles.clone(),
                self.movies.clone(),
                self.posts.clone(),
            )
        }

        pub fn total_calls(&self) -> usize {
            self.articles.calls() + self.movies.calls() + self.posts.calls()
        }
    }
}
