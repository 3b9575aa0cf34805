//! English sentence splitting.
//!
//! A sentence ends at `.`, `!`, or `?` (runs collapse, so "..." and "?!" are
//! single boundaries) followed by whitespace or end of text. Good enough for
//! short social posts; this is not a full tokenizer.

/// Splits `text` into trimmed, non-empty sentences.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut in_terminator = false;

    for (idx, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            in_terminator = true;
        } else if in_terminator {
            in_terminator = false;
            if c.is_whitespace() {
                let sentence = text[start..idx].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = idx;
            }
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_sentences() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n ").is_empty());
    }

    #[test]
    fn single_sentence_without_terminator() {
        assert_eq!(split_sentences("great phone"), vec!["great phone"]);
    }

    #[test]
    fn splits_on_period_followed_by_space() {
        assert_eq!(
            split_sentences("Great phone. Very happy."),
            vec!["Great phone.", "Very happy."]
        );
    }

    #[test]
    fn splits_on_exclamation_and_question_marks() {
        assert_eq!(
            split_sentences("Is it worth it? Absolutely! Buy it."),
            vec!["Is it worth it?", "Absolutely!", "Buy it."]
        );
    }

    #[test]
    fn collapses_terminator_runs() {
        assert_eq!(
            split_sentences("So good... really?! Yes."),
            vec!["So good...", "really?!", "Yes."]
        );
    }

    #[test]
    fn does_not_split_inside_decimals_or_urls() {
        assert_eq!(
            split_sentences("Costs 4.5 stars worth https://example.com/a.b ok"),
            vec!["Costs 4.5 stars worth https://example.com/a.b ok"]
        );
    }

    #[test]
    fn handles_trailing_whitespace_after_final_terminator() {
        assert_eq!(split_sentences("Done.  "), vec!["Done."]);
    }
}
