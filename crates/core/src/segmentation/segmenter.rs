//! Sentence-level transcript chunking.

/// Splits a transcript into sentence chunks on `.` boundaries.
///
/// Chunks are trimmed of surrounding whitespace; empty chunks (consecutive
/// periods, trailing periods) are dropped. Other sentence terminators are
/// left inside their chunk untouched.
pub fn segment(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Whitespace-separated word count, used by the degraded-mode heuristic.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_periods_and_trims() {
        let chunks = segment("First sentence. Second one.  Third  ");
        assert_eq!(chunks, vec!["First sentence", "Second one", "Third"]);
    }

    #[test]
    fn drops_empty_chunks_from_consecutive_periods() {
        let chunks = segment("One... Two.");
        assert_eq!(chunks, vec!["One", "Two"]);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(segment("").is_empty());
        assert!(segment("   ").is_empty());
        assert!(segment("...").is_empty());
    }

    #[test]
    fn keeps_other_terminators_inside_chunks() {
        let chunks = segment("Is this it? Yes! Done.");
        assert_eq!(chunks, vec!["Is this it? Yes! Done"]);
    }

    #[test]
    fn single_sentence_without_period() {
        assert_eq!(segment("no terminator here"), vec!["no terminator here"]);
    }

    #[test]
    fn counts_words_across_whitespace() {
        assert_eq!(word_count("one two  three\nfour"), 4);
        assert_eq!(word_count(""), 0);
    }
}
