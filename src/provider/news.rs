use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use html_escape::decode_html_entities;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::{DashboardError, Result};
use crate::domain::{Article, ContentKind};
use crate::provider::config::{api_key_from_env, ProviderConfig, NEWS_API_KEY_VAR};
use crate::provider::{placeholder, ArticlePage, ArticleSource};

/// NewsAPI `/everything` client.
///
/// Any failure (transport, non-2xx, error body, bad JSON) is logged and
/// answered with the placeholder articles for the requested category.
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Self::with_api_key(config, api_key_from_env(NEWS_API_KEY_VAR))
    }

    pub fn with_api_key(config: &ProviderConfig, api_key: String) -> Result<Self> {
        Ok(Self {
            client: build_client(config.http_timeout())?,
            base_url: config.news_base_url.trim_end_matches('/').to_string(),
            api_key,
            page_size: config.page_size,
        })
    }

    fn endpoint(&self, category: &str, page: u32) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/everything", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("q", category)
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &self.page_size.to_string())
            .append_pair("apiKey", &self.api_key)
            .append_pair("language", "en")
            .append_pair("sortBy", "publishedAt");
        Ok(url)
    }

    async fn request(&self, category: &str, page: u32) -> Result<ArticlePage> {
        let url = self.endpoint(category, page)?;
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        let body = response.bytes().await?;
        parse_articles(&body, category)
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn fetch_articles(&self, category: &str, page: u32) -> Result<ArticlePage> {
        tracing::debug!(category, page, "Fetching articles");
        match self.request(category, page).await {
            Ok(articles) => Ok(articles),
            Err(e) => {
                tracing::warn!(category, error = %e, "News API failed, using placeholder articles");
                Ok(placeholder::articles(category))
            }
        }
    }
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .user_agent("panorama/0.1.0")
        .build()?;
    Ok(client)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    status: String,
    #[serde(default)]
    total_results: u32,
    #[serde(default)]
    articles: Vec<NewsArticle>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NewsSource {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsArticle {
    #[serde(default)]
    source: NewsSource,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

/// Decode a NewsAPI response body into articles tagged with `category`.
pub(crate) fn parse_articles(body: &[u8], category: &str) -> Result<ArticlePage> {
    let response: NewsResponse = serde_json::from_slice(body)?;

    if response.status != "ok" {
        return Err(DashboardError::Upstream {
            kind: ContentKind::Article,
            message: response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        });
    }

    let articles = response
        .articles
        .into_iter()
        .enumerate()
        .map(|(index, a)| Article {
            id: format!("news-{}", index),
            title: a
                .title
                .map(|t| decode_html_entities(&t).to_string())
                .unwrap_or_default(),
            description: a
                .description
                .map(|d| decode_html_entities(&d).to_string())
                .unwrap_or_default(),
            url: a.url.unwrap_or_default(),
            image_url: a.url_to_image,
            published_at: a.published_at,
            source_name: a.source.name.unwrap_or_else(|| "Unknown".to_string()),
            category: category.to_string(),
        })
        .collect();

    Ok(ArticlePage {
        total_results: response.total_results,
        articles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::upstream;

    const SAMPLE: &str = r#"{
        "status": "ok",
        "totalResults": 37,
        "articles": [
            {
                "source": {"id": null, "name": "The Verge"},
                "author": "Jane",
                "title": "Chips &amp; Dips",
                "description": null,
                "url": "https://example.com/chips",
                "urlToImage": null,
                "publishedAt": "2024-03-01T12:00:00Z",
                "content": "..."
            },
            {
                "source": {},
                "title": "Second",
                "description": "Body",
                "url": "https://example.com/2",
                "urlToImage": "https://example.com/2.png",
                "publishedAt": null
            }
        ]
    }"#;

    fn unreachable_config() -> ProviderConfig {
        ProviderConfig {
            // Port 9 (discard) is closed on test machines; connections fail fast.
            news_base_url: "http://127.0.0.1:9/v2".to_string(),
            http_timeout_secs: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_articles() {
        let page = parse_articles(SAMPLE.as_bytes(), "technology").unwrap();
        assert_eq!(page.total_results, 37);
        assert_eq!(page.articles.len(), 2);

        let first = &page.articles[0];
        assert_eq!(first.title, "Chips & Dips");
        assert_eq!(first.description, "");
        assert_eq!(first.source_name, "The Verge");
        assert_eq!(first.category, "technology");
        assert!(first.published_at.is_some());

        let second = &page.articles[1];
        assert_eq!(second.source_name, "Unknown");
        assert_eq!(second.image_url.as_deref(), Some("https://example.com/2.png"));
    }

    #[test]
    fn test_parse_error_status() {
        let body = br#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        let err = parse_articles(body, "sports").unwrap_err();
        assert!(matches!(err, DashboardError::Upstream { kind: ContentKind::Article, .. }));
        assert!(err.to_string().contains("API key is invalid"));
    }

    #[test]
    fn test_endpoint_query() {
        let client = NewsApiClient::with_api_key(&ProviderConfig::default(), "k".into()).unwrap();
        let url = client.endpoint("science fiction", 2).unwrap();
        assert_eq!(url.path(), "/v2/everything");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".into(), "science fiction".into())));
        assert!(pairs.contains(&("page".into(), "2".into())));
        assert!(pairs.contains(&("pageSize".into(), "10".into())));
        assert!(pairs.contains(&("apiKey".into(), "k".into())));
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_placeholder() {
        // A well-formed body must still be rejected when the status is 500.
        let body = r#"{"status":"ok","totalResults":1,"articles":[{"source":{"name":"Real"},"title":"Live story"}]}"#;
        let (base_url, hits) = upstream("500 Internal Server Error", body).await;
        let config = ProviderConfig {
            news_base_url: format!("{}/v2", base_url),
            http_timeout_secs: 5,
            ..Default::default()
        };
        let client = NewsApiClient::with_api_key(&config, "k".into()).unwrap();

        let page = client.fetch_articles("health", 3).await.unwrap();
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(page.articles.len(), 2);
        assert!(page.articles.iter().all(|a| a.source_name == "Mock News"));
        assert!(page.articles.iter().all(|a| a.category == "health"));
        assert!(page.articles[0].title.contains("health"));
    }

    #[tokio::test]
    async fn test_success_status_is_parsed() {
        let body = r#"{"status":"ok","totalResults":1,"articles":[{"source":{"name":"Real"},"title":"Live story"}]}"#;
        let (base_url, _hits) = upstream("200 OK", body).await;
        let config = ProviderConfig {
            news_base_url: format!("{}/v2", base_url),
            http_timeout_secs: 5,
            ..Default::default()
        };
        let client = NewsApiClient::with_api_key(&config, "k".into()).unwrap();

        let page = client.fetch_articles("health", 1).await.unwrap();
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].source_name, "Real");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_falls_back_to_placeholder() {
        let client = NewsApiClient::with_api_key(&unreachable_config(), "k".into()).unwrap();
        let page = client.fetch_articles("sports", 1).await.unwrap();
        assert_eq!(page.articles.len(), 2);
        assert!(page.articles.iter().all(|a| a.category == "sports"));
        assert_eq!(page.articles[0].source_name, "Mock News");
    }
}
