use rayon::prelude::*;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::aggregate::BatchAccumulator;
use crate::analyzer::DocumentAnalyzer;
use crate::config::AnalysisOptions;
use crate::error::{json_kind, BatchInputError, DocumentAnalysisError, Result};
use crate::models::{AnalyzedDocument, BatchReport, CompetitorSet, Document};

/// A validated batch: target company, competitors and the documents that
/// decoded. Documents that failed to decode are kept aside and counted as
/// skipped when the batch runs.
#[derive(Debug)]
pub struct Batch {
    pub brands: CompetitorSet,
    pub documents: Vec<Document>,
    pub options: AnalysisOptions,
    rejected: Vec<DocumentAnalysisError>,
}

#[derive(Deserialize)]
struct RawBatch {
    #[serde(default)]
    target_company: Option<String>,
    #[serde(default)]
    competitors: Vec<String>,
    #[serde(default)]
    documents: Option<serde_json::Value>,
    #[serde(default)]
    options: AnalysisOptions,
}

impl Batch {
    pub fn new<I, S>(target_company: &str, competitors: I, documents: Vec<Document>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            brands: CompetitorSet::new(target_company, competitors)?,
            documents,
            options: AnalysisOptions::default(),
            rejected: Vec::new(),
        })
    }

    pub fn with_options(mut self, options: AnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(input)?)
    }

    /// Rejects the whole batch when the target is missing or `documents` isn't
    /// a list. Individual documents that don't decode are set aside instead.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(BatchInputError::NotAnObject(json_kind(&value)));
        }
        let raw: RawBatch = serde_json::from_value(value)?;
        let target = raw.target_company.unwrap_or_default();
        let brands = CompetitorSet::new(&target, &raw.competitors)?;

        let items = match raw.documents {
            Some(serde_json::Value::Array(items)) => items,
            Some(other) => return Err(BatchInputError::DocumentsNotAList(json_kind(&other))),
            None => return Err(BatchInputError::DocumentsNotAList("nothing")),
        };

        let mut documents = Vec::with_capacity(items.len());
        let mut rejected = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Document>(item) {
                Ok(doc) => documents.push(doc),
                Err(source) => rejected.push(DocumentAnalysisError::Malformed { index, source }),
            }
        }

        Ok(Self {
            brands,
            documents,
            options: raw.options,
            rejected,
        })
    }

    /// Documents supplied, including those that failed to decode.
    pub fn len(&self) -> usize {
        self.documents.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Analyzes every document in parallel and folds the results into a summary.
/// A document that fails is logged and skipped; it never fails the batch.
pub fn run(batch: &Batch) -> BatchReport {
    let start = std::time::Instant::now();
    info!(
        "Batch started - target={}, competitors={}, documents={}",
        batch.brands.target(),
        batch.brands.competitors().len(),
        batch.len()
    );

    for err in &batch.rejected {
        warn!("Skipping document - {}", err);
    }

    let analyzer = DocumentAnalyzer::new(&batch.brands, &batch.options);
    let results: Vec<Option<AnalyzedDocument>> = batch
        .documents
        .par_iter()
        .map(|doc| match analyzer.analyze(doc) {
            Ok(analyzed) => Some(analyzed),
            Err(err) => {
                warn!("Skipping document - id={:?}, error={}", doc.id, err);
                None
            }
        })
        .collect();

    let failed = batch.rejected.len() + results.iter().filter(|r| r.is_none()).count();
    let documents: Vec<AnalyzedDocument> = results.into_iter().flatten().collect();

    let mut acc = documents
        .par_iter()
        .fold(
            || BatchAccumulator::new(&batch.brands),
            |mut acc, doc| {
                acc.add(doc);
                acc
            },
        )
        .reduce(|| BatchAccumulator::new(&batch.brands), BatchAccumulator::merge);
    acc.record_failures(failed);
    let summary = acc.finish();

    debug!(
        "Batch sentiment - average={:.3}, distribution={:?}",
        summary.average_sentiment, summary.sentiment_distribution
    );
    info!(
        "Batch completed - duration={:.2}s, analyzed={}/{}, failed={}",
        start.elapsed().as_secs_f32(),
        summary.total_analyzed,
        summary.total_documents,
        summary.failed_documents
    );

    BatchReport { summary, documents }
}
