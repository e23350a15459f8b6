//! Keyword extraction
//!
//! Picks the most frequent non-trivial words of a text. Keywords annotate
//! stored stories; they play no part in similarity ranking.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use recommender_core::MAX_KEYWORDS;

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]+\b").expect("Invalid word regex"));

/// Words too common to describe a story
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "been", "be", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "can", "this", "that", "these", "those",
    "i", "you", "he", "she", "it", "we", "they", "what", "which", "who", "when", "where", "why",
    "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "such",
    "than", "too", "very",
];

/// Shortest word considered a keyword
const MIN_KEYWORD_LEN: usize = 4;

/// Extract up to [`MAX_KEYWORDS`] keywords from text
pub fn extract_keywords(text: &str) -> Vec<String> {
    extract_top_keywords(text, MAX_KEYWORDS)
}

/// Extract the `k` most frequent keywords, ties broken by first occurrence
pub fn extract_top_keywords(text: &str, k: usize) -> Vec<String> {
    let lower = text.to_lowercase();

    // (count, first position) per word
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in WORD_PATTERN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| w.len() >= MIN_KEYWORD_LEN && !STOP_WORDS.contains(w))
        .enumerate()
    {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(k)
        .map(|(word, _, _)| word.to_string())
        .collect()
}
