use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const TMDB_MOVIE_URL: &str = "https://www.themoviedb.org/movie";
const TMDB_IMAGE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// The provider an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Article,
    Movie,
    Post,
}

impl ContentKind {
    /// Prefix used when synthesizing search identifiers.
    pub fn search_prefix(self) -> &'static str {
        match self {
            ContentKind::Article => "search-news",
            ContentKind::Movie => "search-movie",
            ContentKind::Post => "search-social",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Article => write!(f, "article"),
            ContentKind::Movie => write!(f, "movie"),
            ContentKind::Post => write!(f, "post"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source_name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub external_id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub release_date: String,
    pub vote_average: f64,
    pub genre_ids: Vec<u32>,
}

impl Movie {
    /// Poster URL; relative TMDB paths are resolved against the image CDN.
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_ref().map(|p| {
            if p.starts_with('/') {
                format!("{}{}", TMDB_IMAGE_URL, p)
            } else {
                p.clone()
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author: Author,
    pub hashtags: Vec<String>,
    pub likes: u32,
    pub shares: u32,
    pub timestamp: DateTime<Utc>,
}

/// One entry of the dashboard feed.
///
/// The `id` of every variant is synthesized by the aggregation or search
/// layer; identifiers handed out by providers are overwritten because they
/// are not unique across sources or pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    Article(Article),
    Movie(Movie),
    Post(Post),
}

impl ContentItem {
    pub fn id(&self) -> &str {
        match self {
            ContentItem::Article(a) => &a.id,
            ContentItem::Movie(m) => &m.id,
            ContentItem::Post(p) => &p.id,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentItem::Article(_) => ContentKind::Article,
            ContentItem::Movie(_) => ContentKind::Movie,
            ContentItem::Post(_) => ContentKind::Post,
        }
    }

    /// Replace the identifier, returning the re-stamped item.
    pub fn with_id(mut self, id: String) -> Self {
        match &mut self {
            ContentItem::Article(a) => a.id = id,
            ContentItem::Movie(m) => m.id = id,
            ContentItem::Post(p) => p.id = id,
        }
        self
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Article(a) if !a.title.is_empty() => &a.title,
            ContentItem::Article(_) => "(Untitled)",
            ContentItem::Movie(m) => &m.title,
            ContentItem::Post(p) => &p.author.name,
        }
    }

    /// Body text shown in the detail pane.
    pub fn summary(&self) -> &str {
        match self {
            ContentItem::Article(a) => &a.description,
            ContentItem::Movie(m) => &m.overview,
            ContentItem::Post(p) => &p.content,
        }
    }

    pub fn link(&self) -> Option<String> {
        match self {
            ContentItem::Article(a) if !a.url.is_empty() => Some(a.url.clone()),
            ContentItem::Article(_) => None,
            ContentItem::Movie(m) => Some(format!("{}/{}", TMDB_MOVIE_URL, m.external_id)),
            ContentItem::Post(_) => None,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            ContentItem::Article(a) => a.published_at,
            ContentItem::Movie(_) => None,
            ContentItem::Post(p) => Some(p.timestamp),
        }
    }
}
