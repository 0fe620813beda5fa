use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::HP;
use crate::models::KeywordCount;

static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "is", "it",
        "that", "this", "with", "as", "by", "from", "was", "were", "are", "be", "been", "has",
        "have", "had", "not", "no", "do", "does", "did", "will", "would", "could", "should", "can",
        "may", "might", "if", "then", "than", "so", "up", "out", "about", "into", "over", "after",
        "before", "between", "through", "just", "also", "very", "more", "most", "some", "any",
        "each", "every", "all", "both", "few", "other", "such", "only", "own", "same", "too",
        "how", "what", "which", "who", "when", "where", "why", "there", "their", "they", "them",
        "these", "those", "you", "your", "our", "its", "here", "being", "because", "while",
    ]
    .into_iter()
    .collect()
});

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Most frequent content words, at most `HP.keyword_top_n`, each seen at
/// least `min_frequency` times. Ties keep first-seen order.
pub fn extract_keywords(text: &str, min_frequency: usize) -> Vec<KeywordCount> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD_RE.replace_all(&lowered, "");

    // (word, count) in first-seen order
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for token in cleaned.split_whitespace() {
        if token.chars().count() < HP.keyword_min_len || is_stopword(token) {
            continue;
        }
        match seen.get(token) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                seen.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    counts.retain(|&(_, count)| count >= min_frequency);
    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(HP.keyword_top_n);
    counts
        .into_iter()
        .map(|(keyword, count)| KeywordCount {
            keyword: keyword.to_string(),
            count,
        })
        .collect()
}
