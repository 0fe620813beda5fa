use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

pub(crate) struct Hyperparameters {
    /// Characters captured on each side of a mention.
    pub context_window_chars: usize,
    pub context_sample_cap: usize,
    pub keyword_min_len: usize,
    pub keyword_top_n: usize,
    pub summary_keyword_top_n: usize,
    pub source_top_n: usize,
    pub leaderboard_top_n: usize,
    pub very_positive_above: f64,
    pub very_negative_below: f64,
    pub confidence_scale: f64,
    pub confidence_cap: f64,
    /// Fixed-point scale used when summing sentiment scores.
    pub score_units: f64,
}

pub(crate) static HP: Hyperparameters = Hyperparameters {
    context_window_chars: 100,
    context_sample_cap: 5,
    keyword_min_len: 3,
    keyword_top_n: 20,
    summary_keyword_top_n: 20,
    source_top_n: 10,
    leaderboard_top_n: 20,
    very_positive_above: 2.0,
    very_negative_below: -2.0,
    confidence_scale: 10.0,
    confidence_cap: 100.0,
    score_units: 1_000_000.0,
};

// ---------------------------------------------------------------------------
// Per-run options
// ---------------------------------------------------------------------------

/// What counts as the target being "recommended" by a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPolicy {
    /// Recommended only when the target holds a ranking position.
    #[default]
    Ranked,
    /// Any mention counts as a recommendation (general buying-journey stage).
    Mentioned,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub min_keyword_frequency: usize,
    pub recommendation_policy: RecommendationPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_keyword_frequency: 2,
            recommendation_policy: RecommendationPolicy::default(),
        }
    }
}
