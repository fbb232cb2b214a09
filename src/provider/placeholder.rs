//! Static payloads substituted when an upstream provider is unavailable.

use chrono::{Duration, Utc};

use crate::domain::{Article, Movie};
use crate::provider::{ArticlePage, MoviePage};

pub const PLACEHOLDER_TOTAL_PAGES: u32 = 10;

pub fn articles(category: &str) -> ArticlePage {
    let now = Utc::now();
    ArticlePage {
        total_results: 10,
        articles: vec![
            Article {
                id: "mock-news-1".to_string(),
                title: format!("Latest {} news and updates", category),
                description: format!(
                    "Stay updated with the latest {} news, trends, and developments from around the world.",
                    category
                ),
                url: "https://example.com".to_string(),
                image_url: Some(
                    "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=400&h=200&fit=crop"
                        .to_string(),
                ),
                published_at: Some(now),
                source_name: "Mock News".to_string(),
                category: category.to_string(),
            },
            Article {
                id: "mock-news-2".to_string(),
                title: format!("Breaking: Major developments in {}", category),
                description: format!(
                    "Important updates and breaking news in the {} industry that you need to know.",
                    category
                ),
                url: "https://example.com".to_string(),
                image_url: Some(
                    "https://images.unsplash.com/photo-1585829365295-ab7cd400c167?w=400&h=200&fit=crop"
                        .to_string(),
                ),
                published_at: Some(now - Duration::hours(1)),
                source_name: "Mock News".to_string(),
                category: category.to_string(),
            },
        ],
    }
}

pub fn movies(page: u32) -> MoviePage {
    MoviePage {
        page,
        total_pages: PLACEHOLDER_TOTAL_PAGES,
        total_results: 100,
        movies: vec![
            Movie {
                id: "1".to_string(),
                external_id: 1,
                title: "The Amazing Adventure".to_string(),
                overview: "An epic journey through unknown worlds with stunning visuals and compelling storytelling.".to_string(),
                poster_path: Some(
                    "https://images.unsplash.com/photo-1485846234645-a62644f84728?w=300&h=450&fit=crop"
                        .to_string(),
                ),
                release_date: "2024-01-15".to_string(),
                vote_average: 8.5,
                genre_ids: vec![12, 28, 878],
            },
            Movie {
                id: "2".to_string(),
                external_id: 2,
                title: "Mystery of the Deep".to_string(),
                overview: "A thrilling underwater adventure that explores the mysteries of the ocean depths.".to_string(),
                poster_path: Some(
                    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=300&h=450&fit=crop"
                        .to_string(),
                ),
                release_date: "2024-02-20".to_string(),
                vote_average: 7.8,
                genre_ids: vec![12, 53, 10751],
            },
        ],
    }
}
