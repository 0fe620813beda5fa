//! Brand-visibility signals from LLM answers and discussion threads.
//!
//! Each document is scored for sentiment, searched for brand mentions,
//! rankings, keywords and head-to-head comparisons, and the per-document
//! results are folded into a batch summary.

pub mod aggregate;
pub mod analyzer;
pub mod comparison;
pub mod config;
pub mod error;
pub mod keywords;
pub mod mentions;
pub mod models;
pub mod pipeline;
pub mod ranking;
pub mod sentiment;
pub mod text;

pub use aggregate::{aggregate, BatchAccumulator};
pub use analyzer::DocumentAnalyzer;
pub use comparison::find_comparisons;
pub use config::{AnalysisOptions, RecommendationPolicy};
pub use error::{BatchInputError, DocumentAnalysisError};
pub use keywords::extract_keywords;
pub use mentions::detect_mentions;
pub use models::*;
pub use pipeline::Batch;
pub use ranking::extract_ranking;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyzes a whole batch. Per-document failures are skipped and show up only
/// as `failed_documents` in the summary.
pub fn analyze_batch(batch: &Batch) -> BatchReport {
    pipeline::run(batch)
}

/// Parses a batch from JSON and analyzes it. Fails only when the batch as a
/// whole is unusable.
pub fn analyze_json(input: &str) -> error::Result<BatchReport> {
    let batch = Batch::from_json(input)?;
    Ok(analyze_batch(&batch))
}
