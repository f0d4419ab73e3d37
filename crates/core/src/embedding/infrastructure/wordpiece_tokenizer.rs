//! BERT WordPiece tokenization for the sentence-embedding model.

use std::collections::HashMap;
use std::path::Path;

pub const MAX_SEQUENCE_LEN: usize = 256;

const CLS_TOKEN: &str = "[CLS]";
const SEP_TOKEN: &str = "[SEP]";
const UNK_TOKEN: &str = "[UNK]";
const CONTINUATION_PREFIX: &str = "##";

/// Greedy longest-match WordPiece tokenizer over a plain vocab file
/// (one token per line, line number is the token id).
pub struct WordPieceTokenizer {
    vocab: HashMap<String, i64>,
    cls_id: i64,
    sep_id: i64,
    unk_id: i64,
}

impl WordPieceTokenizer {
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read vocab {}: {e}", path.display()))?;
        Self::from_lines(raw.lines())
    }

    pub fn from_lines<'a>(
        lines: impl Iterator<Item = &'a str>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut vocab = HashMap::new();
        for (id, line) in lines.enumerate() {
            let token = line.trim_end_matches(['\r', '\n']);
            if !token.is_empty() {
                vocab.insert(token.to_owned(), id as i64);
            }
        }

        let special = |token: &str| {
            vocab
                .get(token)
                .copied()
                .ok_or_else(|| format!("vocab is missing the {token} token"))
        };
        let cls_id = special(CLS_TOKEN)?;
        let sep_id = special(SEP_TOKEN)?;
        let unk_id = special(UNK_TOKEN)?;
        Ok(Self {
            vocab,
            cls_id,
            sep_id,
            unk_id,
        })
    }

    /// Encodes one chunk as `[CLS] pieces... [SEP]`, truncated to
    /// `MAX_SEQUENCE_LEN` tokens including the specials.
    pub fn encode(&self, text: &str) -> Vec<i64> {
        let mut ids = vec![self.cls_id];
        for word in split_words(text) {
            ids.extend(self.word_to_ids(&word));
            if ids.len() >= MAX_SEQUENCE_LEN - 1 {
                ids.truncate(MAX_SEQUENCE_LEN - 1);
                break;
            }
        }
        ids.push(self.sep_id);
        ids
    }

    /// Greedy longest-match split of one word into piece ids. A word with
    /// any unmatchable remainder collapses to a single `[UNK]`.
    fn word_to_ids(&self, word: &str) -> Vec<i64> {
        let chars: Vec<char> = word.chars().collect();
        let mut ids = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let mut end = chars.len();
            let mut matched = None;
            while end > start {
                let piece: String = chars[start..end].iter().collect();
                let candidate = if start == 0 {
                    piece
                } else {
                    format!("{CONTINUATION_PREFIX}{piece}")
                };
                if let Some(id) = self.vocab.get(&candidate) {
                    matched = Some(*id);
                    break;
                }
                end -= 1;
            }
            match matched {
                Some(id) => {
                    ids.push(id);
                    start = end;
                }
                None => return vec![self.unk_id],
            }
        }
        ids
    }
}

/// Lowercases and splits on whitespace, then peels ASCII punctuation into
/// standalone tokens the way BERT's basic tokenizer does.
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for raw in text.to_lowercase().split_whitespace() {
        let mut current = String::new();
        for c in raw.chars() {
            if c.is_ascii_punctuation() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                words.push(c.to_string());
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            words.push(current);
        }
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> WordPieceTokenizer {
        let lines = [
            "[PAD]", "[UNK]", "[CLS]", "[SEP]", "the", "talk", "##ing", "talking", "deep", "##ly",
            ",",
        ];
        WordPieceTokenizer::from_lines(lines.into_iter()).unwrap()
    }

    #[test]
    fn wraps_with_cls_and_sep() {
        let ids = tokenizer().encode("the talk");
        assert_eq!(ids, vec![2, 4, 5, 3]);
    }

    #[test]
    fn prefers_the_longest_whole_word_match() {
        // "talking" exists whole, so the greedy match must not split it.
        let ids = tokenizer().encode("talking");
        assert_eq!(ids, vec![2, 7, 3]);
    }

    #[test]
    fn splits_into_continuation_pieces() {
        let ids = tokenizer().encode("deeply");
        assert_eq!(ids, vec![2, 8, 9, 3]);
    }

    #[test]
    fn unmatchable_word_becomes_unk() {
        let ids = tokenizer().encode("zzz");
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn lowercases_and_peels_punctuation() {
        let ids = tokenizer().encode("The, talk");
        assert_eq!(ids, vec![2, 4, 10, 5, 3]);
    }

    #[test]
    fn empty_text_is_just_the_specials() {
        assert_eq!(tokenizer().encode(""), vec![2, 3]);
    }

    #[test]
    fn truncates_long_input_to_max_sequence() {
        let text = "the ".repeat(MAX_SEQUENCE_LEN * 2);
        let ids = tokenizer().encode(&text);
        assert_eq!(ids.len(), MAX_SEQUENCE_LEN);
        assert_eq!(*ids.last().unwrap(), 3);
    }

    #[test]
    fn missing_special_token_is_an_error() {
        let result = WordPieceTokenizer::from_lines(["[CLS]", "[SEP]", "word"].into_iter());
        assert!(result.is_err());
    }
}
