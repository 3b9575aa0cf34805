use demandpulse_core::{round2, Post};

use crate::sentences::split_sentences;

/// The injected sentence-level sentiment capability: given one sentence,
/// return a compound polarity in `[-1, 1]`.
pub trait SentenceScorer: Send + Sync {
    fn compound(&self, sentence: &str) -> f64;
}

/// Engagement-weighted sentiment score for a post's text.
///
/// Averages the compound polarity of each sentence, multiplies by
/// `engagement_weight`, and rounds to 2 decimal places.
///
/// Text with zero sentences scores `0.0`. This is a deliberate policy, not a
/// pass-through of model behavior: an empty post carries no sentiment signal,
/// and averaging over zero sentences is otherwise undefined.
#[must_use]
pub fn score_text(scorer: &dyn SentenceScorer, text: &str, engagement_weight: f64) -> f64 {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = sentences
        .iter()
        .map(|s| scorer.compound(s))
        .sum::<f64>()
        / sentences.len() as f64;

    round2(mean * engagement_weight)
}

/// Scores one post: [`score_text`] with the post's engagement weight
/// (`replies + retweets + favorites + 1`).
#[must_use]
pub fn score_post(scorer: &dyn SentenceScorer, post: &Post) -> f64 {
    score_text(scorer, &post.text, post.engagement_weight())
}
