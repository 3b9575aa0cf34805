//! Lexicon-based compound-polarity model.
//!
//! Scores a sentence by summing word valences, adjusting for negations and
//! booster words in the three preceding tokens, then normalizing the sum into
//! `[-1, 1]` with `sum / sqrt(sum^2 + 15)`.

use crate::scorer::SentenceScorer;

/// Word valences on a roughly `[-4, 4]` scale. Keys are lowercase single words.
const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("best", 3.2),
    ("better", 1.9),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("fast", 1.3),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("impressive", 2.3),
    ("like", 1.5),
    ("love", 3.2),
    ("loved", 2.9),
    ("perfect", 2.7),
    ("recommend", 1.7),
    ("reliable", 1.8),
    ("smooth", 1.5),
    ("solid", 1.5),
    ("worth", 1.3),
    // Negative
    ("awful", -2.9),
    ("bad", -2.5),
    ("broken", -2.1),
    ("buggy", -2.0),
    ("disappointed", -2.3),
    ("disappointing", -2.2),
    ("expensive", -1.2),
    ("fail", -2.3),
    ("failed", -2.3),
    ("hate", -2.7),
    ("horrible", -2.8),
    ("issue", -1.3),
    ("issues", -1.3),
    ("overpriced", -1.9),
    ("poor", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("slow", -1.4),
    ("terrible", -3.0),
    ("waste", -2.4),
    ("worst", -3.1),
];

/// Words that flip the valence of a following lexicon word.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "isnt", "isn't", "dont", "don't", "doesnt", "doesn't",
    "didnt", "didn't", "wont", "won't", "cant", "can't", "wasnt", "wasn't", "barely", "hardly",
];

/// Intensity boosters and dampeners applied to a following lexicon word.
const BOOSTERS: &[(&str, f64)] = &[
    ("very", 0.293),
    ("really", 0.293),
    ("extremely", 0.293),
    ("absolutely", 0.293),
    ("totally", 0.293),
    ("so", 0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("kinda", -0.293),
    ("marginally", -0.293),
];

/// Valence scaling applied when a negation precedes the word.
const NEGATION_FACTOR: f64 = -0.74;

/// Normalization constant for the compound score.
const ALPHA: f64 = 15.0;

/// How many preceding tokens are inspected for negations and boosters.
const CONTEXT_WINDOW: usize = 3;

/// Default [`SentenceScorer`]: the lexicon model above.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SentenceScorer for LexiconScorer {
    fn compound(&self, sentence: &str) -> f64 {
        compound(sentence)
    }
}

/// Compound polarity of one sentence in `[-1, 1]`.
#[must_use]
pub fn compound(sentence: &str) -> f64 {
    let tokens: Vec<String> = sentence
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .collect();

    let mut sum = 0.0_f64;
    for (i, token) in tokens.iter().enumerate() {
        let Some(&(_, base)) = LEXICON.iter().find(|(word, _)| word == token) else {
            continue;
        };

        let mut valence = base;
        let window_start = i.saturating_sub(CONTEXT_WINDOW);
        for prior in &tokens[window_start..i] {
            if NEGATIONS.contains(&prior.as_str()) {
                valence *= NEGATION_FACTOR;
            } else if let Some(&(_, boost)) = BOOSTERS.iter().find(|(word, _)| word == prior) {
                valence += boost * valence.signum();
            }
        }
        sum += valence;
    }

    normalize(sum)
}

/// `sum / sqrt(sum^2 + alpha)`, clamped to `[-1, 1]`.
fn normalize(sum: f64) -> f64 {
    if sum == 0.0 {
        return 0.0;
    }
    (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
}
