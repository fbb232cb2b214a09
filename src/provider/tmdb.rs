use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::Result;
use crate::domain::Movie;
use crate::provider::config::{api_key_from_env, ProviderConfig, TMDB_API_KEY_VAR};
use crate::provider::news::build_client;
use crate::provider::{placeholder, MoviePage, MovieSource};

/// TMDB `/movie/popular` client with placeholder failover.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        Self::with_api_key(config, api_key_from_env(TMDB_API_KEY_VAR))
    }

    pub fn with_api_key(config: &ProviderConfig, api_key: String) -> Result<Self> {
        Ok(Self {
            client: build_client(config.http_timeout())?,
            base_url: config.tmdb_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, page: u32) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/movie/popular", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("api_key", &self.api_key)
            .append_pair("language", "en-US");
        Ok(url)
    }

    async fn request(&self, page: u32) -> Result<MoviePage> {
        let url = self.endpoint(page)?;
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        let body = response.bytes().await?;
        parse_movies(&body)
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn fetch_movies(&self, page: u32) -> Result<MoviePage> {
        tracing::debug!(page, "Fetching movies");
        match self.request(page).await {
            Ok(movies) => Ok(movies),
            Err(e) => {
                tracing::warn!(page, error = %e, "TMDB failed, using placeholder movies");
                Ok(placeholder::movies(page))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbResponse {
    page: u32,
    #[serde(default)]
    results: Vec<TmdbMovie>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genre_ids: Vec<u32>,
}

pub(crate) fn parse_movies(body: &[u8]) -> Result<MoviePage> {
    let response: TmdbResponse = serde_json::from_slice(body)?;

    let movies = response
        .results
        .into_iter()
        .map(|m| Movie {
            id: m.id.to_string(),
            external_id: m.id,
            title: m.title,
            overview: m.overview,
            poster_path: m.poster_path,
            release_date: m.release_date.unwrap_or_default(),
            vote_average: m.vote_average,
            genre_ids: m.genre_ids,
        })
        .collect();

    Ok(MoviePage {
        page: response.page,
        total_pages: response.total_pages,
        total_results: response.total_results,
        movies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::upstream;

    #[test]
    fn test_parse_movies() {
        let body = br#"{
            "page": 2,
            "results": [
                {
                    "adult": false,
                    "id": 550,
                    "title": "Fight Club",
                    "overview": "An insomniac office worker...",
                    "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
                    "release_date": "1999-10-15",
                    "vote_average": 8.4,
                    "genre_ids": [18]
                },
                {"id": 7, "title": "No Poster", "poster_path": null}
            ],
            "total_pages": 500,
            "total_results": 10000
        }"#;

        let page = parse_movies(body).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 500);
        assert_eq!(page.movies.len(), 2);
        assert_eq!(page.movies[0].external_id, 550);
        assert_eq!(page.movies[0].genre_ids, vec![18]);
        assert_eq!(page.movies[1].release_date, "");
        assert!(page.movies[1].poster_path.is_none());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_movies(b"<html>502</html>").is_err());
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_placeholder() {
        let body = r#"{"page":2,"results":[{"id":550,"title":"Fight Club"}],"total_pages":500,"total_results":10000}"#;
        let (base_url, hits) = upstream("500 Internal Server Error", body).await;
        let config = ProviderConfig {
            tmdb_base_url: format!("{}/3", base_url),
            http_timeout_secs: 5,
            ..Default::default()
        };
        let client = TmdbClient::with_api_key(&config, "k".into()).unwrap();

        let page = client.fetch_movies(2).await.unwrap();
        assert_eq!(hits.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 10);
        assert_eq!(page.movies[0].title, "The Amazing Adventure");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_falls_back_to_placeholder() {
        let config = ProviderConfig {
            tmdb_base_url: "http://127.0.0.1:9/3".to_string(),
            http_timeout_secs: 2,
            ..Default::default()
        };
        let client = TmdbClient::with_api_key(&config, "k".into()).unwrap();
        let page = client.fetch_movies(4).await.unwrap();
        assert_eq!(page.page, 4);
        assert_eq!(page.total_pages, 10);
        assert_eq!(page.movies[0].title, "The Amazing Adventure");
    }
}
