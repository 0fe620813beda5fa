//! Error types for the brand-signal pipeline.

use thiserror::Error;

/// Result type for batch-level operations.
pub type Result<T> = std::result::Result<T, BatchInputError>;

/// A batch that cannot be processed at all. Raised before any document is
/// analyzed and surfaced to the caller as-is.
#[derive(Error, Debug)]
pub enum BatchInputError {
    #[error("target company is missing or blank")]
    MissingTargetCompany,

    #[error("documents must be a list, got {0}")]
    DocumentsNotAList(&'static str),

    #[error("batch must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("failed to parse batch JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while analyzing a single document. Recovered inside the pipeline:
/// the document is skipped and its siblings keep going.
#[derive(Error, Debug)]
pub enum DocumentAnalysisError {
    #[error("document #{index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("document has a blank id")]
    BlankId,

    #[error("brand pattern for {brand:?} failed to compile: {source}")]
    Pattern {
        brand: String,
        #[source]
        source: regex::Error,
    },
}

impl DocumentAnalysisError {
    pub(crate) fn pattern(brand: impl Into<String>, source: regex::Error) -> Self {
        Self::Pattern {
            brand: brand.into(),
            source,
        }
    }
}

/// Short JSON type name used in error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}
