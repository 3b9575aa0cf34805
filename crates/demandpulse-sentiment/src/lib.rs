//! Sentiment scoring for demandpulse.
//!
//! Splits post text into English sentences, scores each sentence with a
//! lexicon-based compound-polarity model, averages the per-sentence values,
//! and weights the result by the post's engagement counts. The sentence-level
//! capability is behind the [`SentenceScorer`] trait so an alternative model
//! can be injected.

pub mod lexicon;
pub mod scorer;
pub mod sentences;

pub use lexicon::LexiconScorer;
pub use scorer::{score_post, score_text, SentenceScorer};
pub use sentences::split_sentences;
