use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single social post as delivered by the post source, normalized for
/// scoring and aggregation. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Source-assigned post ID, stored as a string to avoid precision loss.
    pub id: String,
    pub posted_at: DateTime<Utc>,
    pub username: String,
    /// Handle this post replies to, if any.
    pub in_reply_to: Option<String>,
    pub replies: u32,
    pub retweets: u32,
    pub favorites: u32,
    pub text: String,
    /// Free-form geo tag, e.g. `"Delhi, India"`.
    pub geo: Option<String>,
    pub mentions: Vec<String>,
    pub hashtags: Vec<String>,
    pub permalink: String,
}

impl Post {
    /// Engagement multiplier applied to the averaged sentence polarity.
    ///
    /// The `+ 1` keeps a zero-engagement post contributing its raw sentiment
    /// instead of being zeroed out.
    #[must_use]
    pub fn engagement_weight(&self) -> f64 {
        f64::from(self.replies + self.retweets + self.favorites + 1)
    }
}

/// A [`Post`] plus its derived sentiment score. The score is computed once
/// and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPost {
    pub post: Post,
    /// Engagement-weighted compound sentiment, rounded to 2 decimal places.
    pub score: f64,
}

/// Per-product result table for one query run.
///
/// Posts are kept in fetch order (reverse-chronological per the source).
/// Replaced wholesale on the next run; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResult {
    pub product: String,
    pub posts: Vec<ScoredPost>,
    /// `round2(sum of per-post scores)`.
    pub net_score: f64,
}

impl ProductResult {
    /// Builds a result from scored posts, deriving the net score.
    #[must_use]
    pub fn from_posts(product: impl Into<String>, posts: Vec<ScoredPost>) -> Self {
        let net_score = round2(posts.iter().map(|p| p.score).sum());
        Self {
            product: product.into(),
            posts,
            net_score,
        }
    }

    /// Recomputes the net score from the stored per-post scores.
    ///
    /// Must reproduce `net_score` exactly; used as a consistency check.
    #[must_use]
    pub fn recompute_net_score(&self) -> f64 {
        round2(self.posts.iter().map(|p| p.score).sum())
    }

    /// Count of non-negative vs. negative post scores, for the pie drill-down.
    #[must_use]
    pub fn sentiment_split(&self) -> (usize, usize) {
        let positive = self.posts.iter().filter(|p| p.score >= 0.0).count();
        (positive, self.posts.len() - positive)
    }

    /// Day-wise net scores in ascending date order, for the trend drill-down.
    #[must_use]
    pub fn daily_net_scores(&self) -> Vec<(NaiveDate, f64)> {
        let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for scored in &self.posts {
            *by_day.entry(scored.post.posted_at.date_naive()).or_default() += scored.score;
        }
        by_day.into_iter().map(|(d, s)| (d, round2(s))).collect()
    }
}

/// Rounds to 2 decimal places, the precision used for all exposed scores.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
