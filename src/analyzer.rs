use std::borrow::Cow;

use tracing::debug;

use crate::comparison::find_comparisons;
use crate::config::{AnalysisOptions, RecommendationPolicy};
use crate::error::DocumentAnalysisError;
use crate::keywords::extract_keywords;
use crate::mentions::detect_mentions;
use crate::models::{
    AnalyzedDocument, CompetitorSet, Document, DocumentKind, Mentions, RankingResult,
    SentimentSource, TargetVisibility,
};
use crate::ranking::extract_ranking;
use crate::sentiment;
use crate::text::{eq_ignore_case, yes_no_answer};

/// Runs every extractor over one document. Holds no mutable state, so one
/// analyzer can be shared across worker threads.
pub struct DocumentAnalyzer<'a> {
    brands: &'a CompetitorSet,
    options: &'a AnalysisOptions,
}

impl<'a> DocumentAnalyzer<'a> {
    pub fn new(brands: &'a CompetitorSet, options: &'a AnalysisOptions) -> Self {
        Self { brands, options }
    }

    pub fn analyze(&self, doc: &Document) -> Result<AnalyzedDocument, DocumentAnalysisError> {
        if doc.id.trim().is_empty() {
            return Err(DocumentAnalysisError::BlankId);
        }

        let kind = doc.kind();
        let full_text = doc.text();
        let target = doc.company_name_hint().unwrap_or(self.brands.target());
        // a hint may spell one of the competitors
        let competitors: Vec<&str> = self
            .brands
            .competitors()
            .iter()
            .map(String::as_str)
            .filter(|c| !eq_ignore_case(c, target))
            .collect();

        if let Some(answer) = yes_no_answer(&full_text) {
            debug!("Yes/No answer - id={}, answer={}", doc.id, answer);
            return Ok(AnalyzedDocument {
                id: doc.id.clone(),
                source: doc.source.clone(),
                kind,
                target_company: target.to_string(),
                sentiment: sentiment::score(&full_text),
                sentiment_source: SentimentSource::Lexicon,
                mentions: Mentions::default(),
                ranking: None,
                keywords: Vec::new(),
                comparisons: Vec::new(),
                visibility: TargetVisibility::default(),
                yes_no_answer: Some(answer),
            });
        }

        let (sentiment, sentiment_source, body) = match kind {
            DocumentKind::Answer => {
                let (result, source) = sentiment::score_with_declared(&full_text);
                (result, source, sentiment::strip_declared_marker(&full_text))
            }
            DocumentKind::Thread => (
                sentiment::score(&full_text),
                SentimentSource::Lexicon,
                Cow::Borrowed(&*full_text),
            ),
        };

        let mut brands: Vec<&str> = vec![target];
        brands.extend(competitors.iter().copied());
        let mentions = detect_mentions(&body, &brands)?;

        let ranking = match kind {
            DocumentKind::Answer => Some(extract_ranking(&body, target, &competitors)?),
            DocumentKind::Thread => None,
        };
        let keywords = extract_keywords(&body, self.options.min_keyword_frequency);
        let comparisons = find_comparisons(&body, target, &competitors)?;
        let visibility = self.visibility(&mentions, ranking.as_ref(), target);

        debug!(
            "Document analyzed - id={}, score={}, mentions={}, comparisons={}, position={:?}",
            doc.id,
            sentiment.score,
            mentions.len(),
            comparisons.len(),
            visibility.position
        );

        Ok(AnalyzedDocument {
            id: doc.id.clone(),
            source: doc.source.clone(),
            kind,
            target_company: target.to_string(),
            sentiment,
            sentiment_source,
            mentions,
            ranking,
            keywords,
            comparisons,
            visibility,
            yes_no_answer: None,
        })
    }

    fn visibility(
        &self,
        mentions: &Mentions,
        ranking: Option<&RankingResult>,
        target: &str,
    ) -> TargetVisibility {
        let mention_count = mentions.count(target);
        let position = ranking.and_then(|r| r.target_position);
        let recommended = match self.options.recommendation_policy {
            RecommendationPolicy::Ranked => position.is_some(),
            RecommendationPolicy::Mentioned => mention_count > 0 || position.is_some(),
        };
        TargetVisibility {
            mention_count,
            mentioned: mention_count > 0,
            recommended,
            position,
        }
    }
}
