use chrono::{DateTime, Utc};
use serde::Deserialize;

use demandpulse_core::Post;

use crate::error::SourceError;

/// Caller's verdict after each delivered batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchControl {
    Continue,
    /// Stop fetching. An abort, not an error: posts accumulated so far are
    /// still returned.
    Stop,
}

/// How a fetch ended.
#[derive(Debug)]
pub enum FetchStatus {
    /// All matching posts (up to the requested cap) were delivered.
    Complete,
    /// The callback requested a stop; the result is a valid partial.
    Stopped,
    /// A fetch error occurred after zero or more batches; the result holds
    /// whatever was accumulated before the failure.
    Failed(SourceError),
}

/// Result of one fetch call: accumulated posts plus how the fetch ended.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Posts in fetch order (reverse-chronological per the source).
    pub posts: Vec<Post>,
    /// Number of batches delivered to the callback.
    pub batches: usize,
    pub status: FetchStatus,
}

impl FetchOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.status, FetchStatus::Complete)
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self.status, FetchStatus::Stopped)
    }

    /// The error this fetch ended with, if any.
    #[must_use]
    pub fn error(&self) -> Option<&SourceError> {
        match &self.status {
            FetchStatus::Failed(e) => Some(e),
            FetchStatus::Complete | FetchStatus::Stopped => None,
        }
    }
}

/// One page of search results as returned by the post-search service.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    pub posts: Vec<WirePost>,
    /// Opaque cursor for the next page; absent on the last page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Wire representation of a post. Engagement counts and tag lists default to
/// empty when the service omits them.
#[derive(Debug, Deserialize)]
pub struct WirePost {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub username: String,
    #[serde(default)]
    pub in_reply_to: Option<String>,
    #[serde(default)]
    pub replies: u32,
    #[serde(default)]
    pub retweets: u32,
    #[serde(default)]
    pub favorites: u32,
    pub text: String,
    #[serde(default)]
    pub geo: Option<String>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub permalink: String,
}

impl From<WirePost> for Post {
    fn from(wire: WirePost) -> Self {
        Post {
            id: wire.id,
            posted_at: wire.created_at,
            username: wire.username,
            in_reply_to: wire.in_reply_to,
            replies: wire.replies,
            retweets: wire.retweets,
            favorites: wire.favorites,
            text: wire.text,
            geo: wire.geo,
            mentions: wire.mentions,
            hashtags: wire.hashtags,
            permalink: wire.permalink,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_wire_post_with_defaults() {
        let json = r#"{
            "id": "1234",
            "created_at": "2020-05-01T12:30:00Z",
            "username": "buyer",
            "text": "Great phone. Very happy.",
            "permalink": "https://example.com/status/1234"
        }"#;
        let wire: WirePost = serde_json::from_str(json).unwrap();
        assert_eq!(wire.replies, 0);
        assert_eq!(wire.retweets, 0);
        assert_eq!(wire.favorites, 0);
        assert!(wire.mentions.is_empty());
        assert!(wire.geo.is_none());
    }

    #[test]
    fn deserialize_search_page_without_cursor() {
        let json = r#"{ "posts": [] }"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert!(page.posts.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn wire_post_converts_to_post() {
        let json = r##"{
            "id": "9",
            "created_at": "2020-05-01T00:00:00Z",
            "username": "buyer",
            "replies": 1,
            "retweets": 5,
            "favorites": 2,
            "text": "ok",
            "geo": "Delhi, India",
            "mentions": ["@shop"],
            "hashtags": ["#deal"],
            "permalink": "https://example.com/status/9"
        }"##;
        let wire: WirePost = serde_json::from_str(json).unwrap();
        let post: Post = wire.into();
        assert_eq!(post.id, "9");
        assert_eq!(post.engagement_weight(), 9.0);
        assert_eq!(post.hashtags, vec!["#deal".to_string()]);
    }
}
