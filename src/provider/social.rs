use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;

use crate::app::Result;
use crate::domain::{Author, Post};
use crate::provider::{PostSource, PostPage};

const AVATAR_A: &str =
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=50&h=50&fit=crop&crop=face";
const AVATAR_B: &str =
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=50&h=50&fit=crop&crop=face";

struct Template {
    author: &'static str,
    avatar: &'static str,
    default_tag: &'static str,
    default_hashtags: [&'static str; 2],
    text: fn(&str) -> String,
    max_likes: u32,
    max_shares: u32,
    age_hours: i64,
}

const TEMPLATES: [Template; 3] = [
    Template {
        author: "Tech Enthusiast",
        avatar: AVATAR_A,
        default_tag: "technology",
        default_hashtags: ["technology", "innovation"],
        text: |tag| {
            format!(
                "Exciting news about #{}! The latest developments are truly amazing. 🚀",
                tag
            )
        },
        max_likes: 1000,
        max_shares: 100,
        age_hours: 0,
    },
    Template {
        author: "Science Explorer",
        avatar: AVATAR_B,
        default_tag: "science",
        default_hashtags: ["science", "discovery"],
        text: |tag| {
            format!(
                "Just discovered an incredible breakthrough in #{}! This could change everything. 🔬",
                tag
            )
        },
        max_likes: 800,
        max_shares: 50,
        age_hours: 1,
    },
    Template {
        author: "AI Researcher",
        avatar: AVATAR_A,
        default_tag: "AI",
        default_hashtags: ["AI", "future"],
        text: |tag| {
            format!(
                "The future of #{} is here! What do you think about these developments? 🤖",
                tag
            )
        },
        max_likes: 1200,
        max_shares: 200,
        age_hours: 2,
    },
];

/// Simulated social feed.
///
/// Never fails; every call sleeps for `latency` and then synthesizes three
/// posts with fresh timestamps and random engagement counters, so repeated
/// calls with the same arguments return different data.
#[derive(Debug, Clone)]
pub struct MockSocialSource {
    latency: Duration,
}

impl MockSocialSource {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockSocialSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[async_trait]
impl PostSource for MockSocialSource {
    async fn fetch_posts(&self, hashtags: &[String], page: u32) -> Result<PostPage> {
        tracing::debug!(?hashtags, page, "Fetching posts");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let posts = synthesize(hashtags, page);
        Ok(PostPage {
            total: posts.len() as u32,
            posts,
        })
    }
}

fn synthesize(hashtags: &[String], page: u32) -> Vec<Post> {
    let mut rng = rand::rng();
    let now = Utc::now();

    TEMPLATES
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let tag = hashtags.first().map(String::as_str).unwrap_or(t.default_tag);
            let tags = if hashtags.is_empty() {
                t.default_hashtags.iter().map(|s| s.to_string()).collect()
            } else {
                hashtags.to_vec()
            };
            Post {
                id: format!("social-{}-{}", page, i + 1),
                content: (t.text)(tag),
                author: Author {
                    name: t.author.to_string(),
                    avatar: t.avatar.to_string(),
                },
                hashtags: tags,
                likes: rng.random_range(0..t.max_likes),
                shares: rng.random_range(0..t.max_shares),
                timestamp: now - chrono::Duration::hours(t.age_hours),
            }
        })
        .collect()
}
