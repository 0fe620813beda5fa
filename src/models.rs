use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::HP;
use crate::error::{BatchInputError, Result};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One unit of raw text handed over by whatever fetched it. Never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Where the document came from, e.g. a subreddit or an answer engine.
    #[serde(default)]
    pub source: String,
    #[serde(flatten)]
    pub content: DocumentContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name_hint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentContent {
    /// A single LLM answer.
    Answer { text: String },
    /// A discussion thread: title, body and every comment body.
    Thread {
        title: String,
        #[serde(default)]
        body: String,
        #[serde(default)]
        comments: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Answer,
    Thread,
}

impl Document {
    pub fn answer(
        id: impl Into<String>,
        source: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            content: DocumentContent::Answer { text: text.into() },
            company_name_hint: None,
        }
    }

    pub fn thread(
        id: impl Into<String>,
        source: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        comments: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            content: DocumentContent::Thread {
                title: title.into(),
                body: body.into(),
                comments,
            },
            company_name_hint: None,
        }
    }

    pub fn with_company_name_hint(mut self, hint: impl Into<String>) -> Self {
        self.company_name_hint = Some(hint.into());
        self
    }

    pub fn kind(&self) -> DocumentKind {
        match self.content {
            DocumentContent::Answer { .. } => DocumentKind::Answer,
            DocumentContent::Thread { .. } => DocumentKind::Thread,
        }
    }

    /// The text the pipeline analyzes. Thread parts are joined with a single
    /// space; empty parts are left out.
    pub fn text(&self) -> Cow<'_, str> {
        match &self.content {
            DocumentContent::Answer { text } => Cow::Borrowed(text.as_str()),
            DocumentContent::Thread {
                title,
                body,
                comments,
            } => {
                let parts: Vec<&str> = std::iter::once(title.as_str())
                    .chain(std::iter::once(body.as_str()))
                    .chain(comments.iter().map(String::as_str))
                    .filter(|p| !p.trim().is_empty())
                    .collect();
                Cow::Owned(parts.join(" "))
            }
        }
    }

    /// The non-blank company name hint, if any.
    pub fn company_name_hint(&self) -> Option<&str> {
        self.company_name_hint
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
    }
}

/// Target company plus its competitors, unique by case-insensitive name.
#[derive(Debug, Clone, Serialize)]
pub struct CompetitorSet {
    target: String,
    competitors: Vec<String>,
}

impl CompetitorSet {
    /// Blank competitor names, repeats and the target itself are dropped.
    pub fn new<I, S>(target: &str, competitors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let target = target.trim();
        if target.is_empty() {
            return Err(BatchInputError::MissingTargetCompany);
        }
        let mut seen = vec![target.to_lowercase()];
        let mut kept = Vec::new();
        for name in competitors {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            let key = name.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            kept.push(name.to_string());
        }
        Ok(Self {
            target: target.to_string(),
            competitors: kept,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn competitors(&self) -> &[String] {
        &self.competitors
    }
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 5] = [
        SentimentLabel::VeryNegative,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Positive,
        SentimentLabel::VeryPositive,
    ];

    /// First matching cut-point wins.
    pub fn from_score(score: f64) -> Self {
        if score > HP.very_positive_above {
            SentimentLabel::VeryPositive
        } else if score > 0.0 {
            SentimentLabel::Positive
        } else if score < HP.very_negative_below {
            SentimentLabel::VeryNegative
        } else if score < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub comparative: f64,
    pub label: SentimentLabel,
    pub confidence: f64,
    pub word_count: usize,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            comparative: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            word_count: 0,
        }
    }
}

/// Where a document's sentiment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentSource {
    Lexicon,
    /// An in-band `###SENTIMENTS:` marker.
    Declared,
}

// ---------------------------------------------------------------------------
// Extraction results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRecord {
    pub count: usize,
    /// At most a handful of distinct surrounding snippets, not every occurrence.
    pub contexts: Vec<String>,
}

/// Mentions per brand. Brands that never occur have no entry; look them up
/// through [`Mentions::count`], which reads a missing entry as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mentions(pub BTreeMap<String, MentionRecord>);

impl Mentions {
    pub fn count(&self, brand: &str) -> usize {
        self.0.get(brand).map_or(0, |r| r.count)
    }

    pub fn get(&self, brand: &str) -> Option<&MentionRecord> {
        self.0.get(brand)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMethod {
    /// Parsed from a "Forced Ranking" section.
    ExplicitSection,
    /// First-occurrence order of known names in the prose.
    ProseOrder,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCompany {
    /// 1-indexed.
    pub position: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingResult {
    pub method: RankingMethod,
    pub entries: Vec<RankedCompany>,
    pub target_position: Option<usize>,
}

impl RankingResult {
    pub fn not_found() -> Self {
        Self {
            method: RankingMethod::NotFound,
            entries: Vec::new(),
            target_position: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit sections list as `"1. Acme"`, prose order as bare names.
    pub fn ordered_companies(&self) -> Vec<String> {
        match self.method {
            RankingMethod::ExplicitSection => self
                .entries
                .iter()
                .map(|e| format!("{}. {}", e.position, e.name))
                .collect(),
            _ => self.entries.iter().map(|e| e.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSnippet {
    pub text: String,
    pub sentiment: SentimentResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetVisibility {
    pub mention_count: usize,
    pub mentioned: bool,
    pub recommended: bool,
    pub position: Option<usize>,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedDocument {
    pub id: String,
    pub source: String,
    pub kind: DocumentKind,
    /// Name the target was searched under (the hint, when one was given).
    pub target_company: String,
    pub sentiment: SentimentResult,
    pub sentiment_source: SentimentSource,
    pub mentions: Mentions,
    pub ranking: Option<RankingResult>,
    pub keywords: Vec<KeywordCount>,
    pub comparisons: Vec<ComparisonSnippet>,
    pub visibility: TargetVisibility,
    /// Set when the whole document is a bare Yes/No answer.
    pub yes_no_answer: Option<bool>,
}

// ---------------------------------------------------------------------------
// Batch output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStats {
    pub count: usize,
    pub average_sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCount {
    pub source: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorStats {
    /// Sum of mention counts across documents.
    pub count: usize,
    pub documents: usize,
    pub average_sentiment_label: SentimentLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetStats {
    pub name: String,
    pub mentions: usize,
    pub documents_mentioning: usize,
    pub documents_recommending: usize,
    pub mention_rate: f64,
    pub recommendation_rate: f64,
    pub ranked_documents: usize,
    pub average_position: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub company: String,
    pub appearances: usize,
    pub average_position: f64,
    pub first_place: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStats {
    pub total: usize,
    pub average_sentiment: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YesNoTally {
    pub yes: usize,
    pub no: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_documents: usize,
    pub total_analyzed: usize,
    pub failed_documents: usize,
    pub sentiment_distribution: BTreeMap<SentimentLabel, usize>,
    pub average_sentiment: f64,
    pub per_source_stats: BTreeMap<String, SourceStats>,
    pub top_sources: Vec<SourceCount>,
    pub top_keywords: Vec<KeywordCount>,
    pub competitor_stats: BTreeMap<String, CompetitorStats>,
    pub target: TargetStats,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub comparisons: ComparisonStats,
    pub yes_no: YesNoTally,
}

/// Summary plus the per-document detail, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub documents: Vec<AnalyzedDocument>,
}
