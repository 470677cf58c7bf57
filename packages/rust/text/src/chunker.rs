//! Sentence-accumulating chunker for retrieval passages.
//!
//! Sentences are split on bare terminal punctuation, so abbreviations and
//! decimals mis-split. Passages are a best-effort grouping, not a segmentation.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Default passage size in words.
pub const DEFAULT_TARGET_WORD_COUNT: usize = 200;

/// Approximate characters per word.
const CHARS_PER_WORD: usize = 5;

/// Passages must be strictly longer than this many characters.
pub const MIN_PASSAGE_CHARS: usize = 100;

/// A passage must mention at least one of these to be kept.
pub const RELEVANCE_TERMS: &[&str] = &[
    "treatment",
    "patient",
    "wound",
    "surgery",
    "medical",
    "care",
    "bleeding",
    "pain",
    "injury",
    "emergency",
    "first aid",
    "procedure",
];

/// Split `text` into passages of roughly `target_word_count` words.
///
/// Only passages longer than [`MIN_PASSAGE_CHARS`] that contain a
/// [`RELEVANCE_TERMS`] entry are returned.
pub fn chunk_text(text: &str, target_word_count: usize) -> Vec<String> {
    static SENTENCE_END_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

    let max_chars = target_word_count.saturating_mul(CHARS_PER_WORD);
    let mut passages: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for sentence in SENTENCE_END_RE.split(text) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let sentence_chars = sentence.chars().count();
        if current_chars + sentence_chars > max_chars {
            if !current.is_empty() {
                passages.push(std::mem::take(&mut current));
            }
            current.push_str(sentence);
            current_chars = sentence_chars;
        } else {
            if !current.is_empty() {
                current.push(' ');
                current_chars += 1;
            }
            current.push_str(sentence);
            current_chars += sentence_chars;
        }
    }

    if !current.is_empty() {
        passages.push(current);
    }

    let total = passages.len();
    let kept: Vec<String> = passages.into_iter().filter(|p| is_relevant(p)).collect();

    debug!(total, kept = kept.len(), "chunked text");
    kept
}

fn is_relevant(passage: &str) -> bool {
    if passage.chars().count() <= MIN_PASSAGE_CHARS {
        return false;
    }
    let lower = passage.to_lowercase();
    RELEVANCE_TERMS.iter().any(|term| lower.contains(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A sentence of exactly `len` characters (without terminator) mentioning `term`.
    fn sentence_with(term: &str, len: usize) -> String {
        let mut s = format!("The {term} note");
        while s.len() < len {
            s.push_str(" x");
        }
        s.truncate(len);
        if s.ends_with(' ') {
            s.pop();
            s.push('y');
        }
        s
    }

    #[test]
    fn short_passage_is_dropped() {
        let text = "Stop the bleeding quickly.";
        assert!(chunk_text(text, DEFAULT_TARGET_WORD_COUNT).is_empty());
    }

    #[test]
    fn exactly_min_length_is_dropped() {
        let text = sentence_with("bleeding", MIN_PASSAGE_CHARS);
        assert_eq!(text.chars().count(), MIN_PASSAGE_CHARS);
        assert!(chunk_text(&text, DEFAULT_TARGET_WORD_COUNT).is_empty());
    }

    #[test]
    fn irrelevant_passage_is_dropped() {
        let text = "The committee thanks all reviewers and translators who contributed to this \
                    edition, and acknowledges the publishers for permission to reproduce figures.";
        assert!(text.len() > MIN_PASSAGE_CHARS);
        assert!(chunk_text(text, DEFAULT_TARGET_WORD_COUNT).is_empty());
    }

    #[test]
    fn long_bleeding_passage_passes() {
        let text = sentence_with("bleeding", 140);
        let chunks = chunk_text(&text, DEFAULT_TARGET_WORD_COUNT);
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn relevance_match_is_case_insensitive() {
        let text = format!("{}.", sentence_with("FIRST AID", 120));
        assert_eq!(chunk_text(&text, DEFAULT_TARGET_WORD_COUNT).len(), 1);
    }

    #[test]
    fn sentences_are_joined_until_limit() {
        // Three 60-char sentences.
        let a = sentence_with("patient", 60);
        let b = sentence_with("wound", 60);
        let c = sentence_with("pain", 60);
        let text = format!("{a}. {b}! {c}?");

        let wide = chunk_text(&text, DEFAULT_TARGET_WORD_COUNT);
        assert_eq!(wide.len(), 1);
        assert_eq!(wide[0], format!("{a} {b} {c}?"));

        // A 20-word target (100 chars) closes each sentence alone, all below the minimum.
        assert!(chunk_text(&text, 20).is_empty());
    }

    #[test]
    fn splits_when_limit_exceeded() {
        let a = sentence_with("patient", 150);
        let b = sentence_with("wound", 150);
        let text = format!("{a}. {b}.");

        // 30 words = 150 chars: the second sentence cannot join the first.
        let chunks = chunk_text(&text, 30);
        assert_eq!(chunks, vec![a, format!("{b}.")]);
    }

    #[test]
    fn terminator_without_whitespace_does_not_split() {
        let text = format!("Give 2.5 ml to the patient now. {}", sentence_with("care", 90));
        let chunks = chunk_text(&text, DEFAULT_TARGET_WORD_COUNT);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("Give 2.5 ml to the patient now "));
    }

    #[test]
    fn huge_target_keeps_whole_text_together() {
        let a = sentence_with("patient", 120);
        let b = sentence_with("wound", 120);
        let text = format!("{a}. {b}.");

        let chunks = chunk_text(&text, usize::MAX);
        assert_eq!(chunks, vec![format!("{a} {b}.")]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(chunk_text("", DEFAULT_TARGET_WORD_COUNT).is_empty());
        assert!(chunk_text(" .  ! ", DEFAULT_TARGET_WORD_COUNT).is_empty());
    }
}
