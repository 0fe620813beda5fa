//! Lexicon-based sentiment scoring.
//!
//! Scores are the sum of word weights from a fixed AFINN-style lexicon
//! (-5..=5). Answers may also carry an in-band `###SENTIMENTS: <0..1>` marker
//! which, when well-formed, overrides the lexicon score.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::HP;
use crate::models::{SentimentLabel, SentimentResult, SentimentSource};

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

static LEXICON: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    [
        // Strongly positive
        ("outstanding", 5),
        ("superb", 5),
        ("breathtaking", 5),
        ("excellent", 3),
        ("amazing", 4),
        ("awesome", 4),
        ("fantastic", 4),
        ("wonderful", 4),
        ("brilliant", 4),
        ("exceptional", 4),
        ("love", 3),
        ("loved", 3),
        ("loves", 3),
        ("best", 3),
        ("perfect", 3),
        ("great", 3),
        ("impressive", 3),
        ("delighted", 3),
        ("superior", 2),
        ("winner", 4),
        ("wins", 4),
        ("win", 4),
        // Positive
        ("good", 3),
        ("nice", 3),
        ("like", 2),
        ("liked", 2),
        ("happy", 3),
        ("glad", 3),
        ("recommend", 2),
        ("recommended", 2),
        ("reliable", 2),
        ("trusted", 2),
        ("trust", 1),
        ("easy", 1),
        ("intuitive", 2),
        ("fast", 1),
        ("efficient", 2),
        ("effective", 2),
        ("helpful", 2),
        ("useful", 2),
        ("valuable", 2),
        ("affordable", 2),
        ("strong", 2),
        ("solid", 2),
        ("robust", 2),
        ("secure", 2),
        ("stable", 2),
        ("popular", 3),
        ("leading", 2),
        ("leader", 2),
        ("innovative", 2),
        ("powerful", 2),
        ("flexible", 2),
        ("satisfied", 2),
        ("pleased", 3),
        ("enjoy", 2),
        ("improved", 2),
        ("improvement", 2),
        ("better", 2),
        ("success", 2),
        ("successful", 3),
        ("favorite", 2),
        ("favourite", 2),
        ("support", 2),
        ("supportive", 2),
        ("smooth", 2),
        ("seamless", 2),
        ("clean", 2),
        ("benefit", 2),
        ("advantage", 2),
        ("worth", 2),
        ("cool", 1),
        ("fine", 2),
        ("ok", 1),
        ("okay", 1),
        ("thanks", 2),
        ("thank", 2),
        ("positive", 2),
        ("fair", 2),
        ("clear", 1),
        ("top", 2),
        // Negative
        ("bad", -3),
        ("poor", -2),
        ("worse", -3),
        ("worst", -3),
        ("hate", -3),
        ("hated", -3),
        ("dislike", -2),
        ("disappointed", -2),
        ("disappointing", -2),
        ("frustrated", -2),
        ("frustrating", -2),
        ("annoying", -2),
        ("annoyed", -2),
        ("slow", -2),
        ("expensive", -2),
        ("overpriced", -3),
        ("costly", -2),
        ("buggy", -2),
        ("bug", -2),
        ("bugs", -2),
        ("broken", -1),
        ("crash", -2),
        ("crashes", -2),
        ("fail", -2),
        ("failed", -2),
        ("fails", -2),
        ("failure", -2),
        ("problem", -2),
        ("problems", -2),
        ("issue", -1),
        ("issues", -1),
        ("complicated", -2),
        ("confusing", -2),
        ("difficult", -1),
        ("hard", -1),
        ("limited", -1),
        ("lacking", -2),
        ("lack", -2),
        ("weak", -2),
        ("unreliable", -2),
        ("unstable", -2),
        ("insecure", -2),
        ("risk", -2),
        ("risky", -2),
        ("concern", -1),
        ("concerns", -1),
        ("complaint", -2),
        ("complaints", -2),
        ("negative", -2),
        ("wrong", -2),
        ("unhappy", -2),
        ("useless", -2),
        ("outdated", -2),
        ("clunky", -2),
        ("drawback", -2),
        ("drawbacks", -2),
        ("downside", -2),
        ("downsides", -2),
        ("lose", -3),
        ("loses", -3),
        ("lost", -3),
        ("scam", -2),
        ("fraud", -4),
        ("sucks", -3),
        ("terrible", -3),
        ("horrible", -3),
        ("awful", -3),
        ("disaster", -2),
        ("nightmare", -3),
        ("avoid", -1),
        ("angry", -3),
        ("worried", -3),
        ("waste", -1),
        ("ripoff", -3),
        ("garbage", -1),
        ("mediocre", -3),
        ("pathetic", -2),
        ("abysmal", -5),
    ]
    .into_iter()
    .collect()
});

// ---------------------------------------------------------------------------
// Declared-sentiment marker
// ---------------------------------------------------------------------------

static DECLARED_VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)#{3}\s*SENTIMENTS?[ \t]*:[ \t]*([^\s]*)").unwrap());

static DECLARED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)#{3}\s*SENTIMENTS?[ \t]*:[^\n]*").unwrap());

/// Value of the first `###SENTIMENTS:` marker, if it parses to a number in
/// `[0, 1]`. Anything else reads as "no marker".
pub fn declared_sentiment(text: &str) -> Option<f64> {
    let caps = DECLARED_VALUE_RE.captures(text)?;
    let raw = caps[1].trim_end_matches(|c: char| !c.is_ascii_digit());
    let value: f64 = raw.parse().ok()?;
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Some(value.clamp(-1.0, 1.0))
    } else {
        None
    }
}

/// The text with every marker removed, so marker tokens never reach the
/// other extractors.
pub fn strip_declared_marker(text: &str) -> Cow<'_, str> {
    DECLARED_LINE_RE.replace_all(text, "")
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|&c| c != '\'' && c != '\u{2019}')
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(str::to_string).collect()
}

fn confidence_for(comparative: f64) -> f64 {
    (comparative.abs() * HP.confidence_scale).min(HP.confidence_cap) / 100.0
}

/// Lexicon score for any text. Empty text scores neutral.
pub fn score(text: &str) -> SentimentResult {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return SentimentResult::neutral();
    }
    let total: i32 = tokens
        .iter()
        .filter_map(|t| LEXICON.get(t.as_str()))
        .sum();
    let score = f64::from(total);
    let comparative = score / tokens.len() as f64;
    SentimentResult {
        score,
        comparative,
        label: SentimentLabel::from_score(score),
        confidence: confidence_for(comparative),
        word_count: tokens.len(),
    }
}

/// Answer-text variant: a well-formed declared marker wins, otherwise the
/// lexicon scores the text with markers stripped.
pub fn score_with_declared(text: &str) -> (SentimentResult, SentimentSource) {
    let stripped = strip_declared_marker(text);
    let lexicon = score(&stripped);
    match declared_sentiment(text) {
        Some(value) => (
            SentimentResult {
                score: value,
                comparative: value,
                label: SentimentLabel::from_score(value),
                confidence: 1.0,
                word_count: lexicon.word_count,
            },
            SentimentSource::Declared,
        ),
        None => (lexicon, SentimentSource::Lexicon),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_drops_apostrophes_and_splits_on_punctuation() {
        let tokens = tokenize("Don't stop, it's well-known!");
        assert_eq!(tokens, ["dont", "stop", "its", "well", "known"]);
    }

    #[test]
    fn marker_value_tolerates_trailing_punctuation() {
        assert_eq!(declared_sentiment("###SENTIMENTS: 0.5."), Some(0.5));
        assert_eq!(declared_sentiment("### sentiments:1"), Some(1.0));
    }
}
