//! Batch aggregation.
//!
//! [`BatchAccumulator`] keeps only sums and counts, so adding documents in any
//! order, or aggregating sub-batches and merging them, gives the same
//! accumulator. Sentiment scores are summed in integer millionths because
//! floating-point addition is not associative. Top-N lists are cut only in
//! [`BatchAccumulator::finish`], with ties broken by key.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::HP;
use crate::models::{
    AnalyzedDocument, BatchSummary, CompetitorSet, CompetitorStats, ComparisonStats,
    KeywordCount, LeaderboardEntry, SentimentLabel, SourceCount, SourceStats, TargetStats,
    YesNoTally,
};

const UNKNOWN_SOURCE: &str = "unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScoreSum {
    micros: i64,
    count: usize,
}

impl ScoreSum {
    fn add(&mut self, score: f64) {
        self.micros += (score * HP.score_units).round() as i64;
        self.count += 1;
    }

    fn merge(&mut self, other: ScoreSum) {
        self.micros += other.micros;
        self.count += other.count;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.micros as f64 / HP.score_units / self.count as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CompetitorTally {
    mentions: usize,
    /// Scores of the documents that mention the competitor.
    sentiment: ScoreSum,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RankTally {
    /// Smallest spelling seen, so the display name doesn't depend on order.
    name: String,
    appearances: usize,
    position_sum: usize,
    first_place: usize,
}

impl RankTally {
    fn merge(&mut self, other: RankTally) {
        if self.name.is_empty() || (!other.name.is_empty() && other.name < self.name) {
            self.name = other.name;
        }
        self.appearances += other.appearances;
        self.position_sum += other.position_sum;
        self.first_place += other.first_place;
    }

    fn average_position(&self) -> f64 {
        if self.appearances == 0 {
            0.0
        } else {
            self.position_sum as f64 / self.appearances as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TargetTally {
    mentions: usize,
    documents_mentioning: usize,
    documents_recommending: usize,
    position_sum: usize,
    ranked_documents: usize,
}

/// Mergeable partial aggregate over analyzed documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchAccumulator {
    target: String,
    analyzed: usize,
    failed: usize,
    sentiment: ScoreSum,
    distribution: BTreeMap<SentimentLabel, usize>,
    sources: BTreeMap<String, ScoreSum>,
    keywords: BTreeMap<String, usize>,
    competitors: BTreeMap<String, CompetitorTally>,
    target_tally: TargetTally,
    leaderboard: BTreeMap<String, RankTally>,
    comparisons: ScoreSum,
    yes_no: YesNoTally,
}

impl BatchAccumulator {
    /// Every competitor gets an entry up front, so unmentioned ones still show
    /// up in the summary.
    pub fn new(brands: &CompetitorSet) -> Self {
        Self {
            target: brands.target().to_string(),
            competitors: brands
                .competitors()
                .iter()
                .map(|c| (c.clone(), CompetitorTally::default()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn add(&mut self, doc: &AnalyzedDocument) {
        let score = doc.sentiment.score;
        self.analyzed += 1;
        self.sentiment.add(score);
        *self.distribution.entry(doc.sentiment.label).or_insert(0) += 1;

        let source = if doc.source.trim().is_empty() {
            UNKNOWN_SOURCE
        } else {
            doc.source.as_str()
        };
        self.sources.entry(source.to_string()).or_default().add(score);

        for kw in &doc.keywords {
            *self.keywords.entry(kw.keyword.clone()).or_insert(0) += kw.count;
        }

        for (name, tally) in self.competitors.iter_mut() {
            let count = doc.mentions.count(name);
            if count > 0 {
                tally.mentions += count;
                tally.sentiment.add(score);
            }
        }

        let vis = &doc.visibility;
        self.target_tally.mentions += vis.mention_count;
        if vis.mentioned {
            self.target_tally.documents_mentioning += 1;
        }
        if vis.recommended {
            self.target_tally.documents_recommending += 1;
        }
        if let Some(position) = vis.position {
            self.target_tally.position_sum += position;
            self.target_tally.ranked_documents += 1;
        }

        if let Some(ranking) = &doc.ranking {
            for entry in &ranking.entries {
                let incoming = RankTally {
                    name: entry.name.clone(),
                    appearances: 1,
                    position_sum: entry.position,
                    first_place: usize::from(entry.position == 1),
                };
                self.leaderboard
                    .entry(entry.name.to_lowercase())
                    .or_default()
                    .merge(incoming);
            }
        }

        for snippet in &doc.comparisons {
            self.comparisons.add(snippet.sentiment.score);
        }

        match doc.yes_no_answer {
            Some(true) => self.yes_no.yes += 1,
            Some(false) => self.yes_no.no += 1,
            None => {}
        }
    }

    /// Documents that were skipped; they count towards the total only.
    pub fn record_failures(&mut self, count: usize) {
        self.failed += count;
    }

    pub fn merge(mut self, other: BatchAccumulator) -> BatchAccumulator {
        if self.target.is_empty() {
            self.target = other.target;
        }
        self.analyzed += other.analyzed;
        self.failed += other.failed;
        self.sentiment.merge(other.sentiment);
        for (label, n) in other.distribution {
            *self.distribution.entry(label).or_insert(0) += n;
        }
        for (source, sum) in other.sources {
            self.sources.entry(source).or_default().merge(sum);
        }
        for (keyword, n) in other.keywords {
            *self.keywords.entry(keyword).or_insert(0) += n;
        }
        for (name, tally) in other.competitors {
            let mine = self.competitors.entry(name).or_default();
            mine.mentions += tally.mentions;
            mine.sentiment.merge(tally.sentiment);
        }
        let t = other.target_tally;
        self.target_tally.mentions += t.mentions;
        self.target_tally.documents_mentioning += t.documents_mentioning;
        self.target_tally.documents_recommending += t.documents_recommending;
        self.target_tally.position_sum += t.position_sum;
        self.target_tally.ranked_documents += t.ranked_documents;
        for (key, tally) in other.leaderboard {
            self.leaderboard.entry(key).or_default().merge(tally);
        }
        self.comparisons.merge(other.comparisons);
        self.yes_no.yes += other.yes_no.yes;
        self.yes_no.no += other.yes_no.no;
        self
    }

    pub fn finish(&self) -> BatchSummary {
        let sentiment_distribution = SentimentLabel::ALL
            .iter()
            .map(|&label| (label, self.distribution.get(&label).copied().unwrap_or(0)))
            .collect();

        let per_source_stats = self
            .sources
            .iter()
            .map(|(source, sum)| {
                (
                    source.clone(),
                    SourceStats {
                        count: sum.count,
                        average_sentiment: sum.mean(),
                    },
                )
            })
            .collect();

        let mut top_sources: Vec<SourceCount> = self
            .sources
            .iter()
            .map(|(source, sum)| SourceCount {
                source: source.clone(),
                count: sum.count,
            })
            .collect();
        top_sources.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.source.cmp(&b.source)));
        top_sources.truncate(HP.source_top_n);

        let mut top_keywords: Vec<KeywordCount> = self
            .keywords
            .iter()
            .map(|(keyword, &count)| KeywordCount {
                keyword: keyword.clone(),
                count,
            })
            .collect();
        top_keywords.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
        top_keywords.truncate(HP.summary_keyword_top_n);

        let competitor_stats = self
            .competitors
            .iter()
            .map(|(name, tally)| {
                let label = match tally.sentiment.count {
                    0 => SentimentLabel::Neutral,
                    _ if tally.sentiment.micros > 0 => SentimentLabel::Positive,
                    _ => SentimentLabel::Negative,
                };
                (
                    name.clone(),
                    CompetitorStats {
                        count: tally.mentions,
                        documents: tally.sentiment.count,
                        average_sentiment_label: label,
                    },
                )
            })
            .collect();

        let mut leaders: Vec<&RankTally> = self.leaderboard.values().collect();
        leaders.sort_by(|a, b| {
            b.appearances
                .cmp(&a.appearances)
                .then_with(|| compare_average_position(a, b))
                .then_with(|| a.name.cmp(&b.name))
        });
        let leaderboard = leaders
            .into_iter()
            .take(HP.leaderboard_top_n)
            .map(|t| LeaderboardEntry {
                company: t.name.clone(),
                appearances: t.appearances,
                average_position: t.average_position(),
                first_place: t.first_place,
            })
            .collect();

        let t = &self.target_tally;
        let target = TargetStats {
            name: self.target.clone(),
            mentions: t.mentions,
            documents_mentioning: t.documents_mentioning,
            documents_recommending: t.documents_recommending,
            mention_rate: ratio(t.documents_mentioning, self.analyzed),
            recommendation_rate: ratio(t.documents_recommending, self.analyzed),
            ranked_documents: t.ranked_documents,
            average_position: (t.ranked_documents > 0)
                .then(|| t.position_sum as f64 / t.ranked_documents as f64),
        };

        BatchSummary {
            total_documents: self.analyzed + self.failed,
            total_analyzed: self.analyzed,
            failed_documents: self.failed,
            sentiment_distribution,
            average_sentiment: self.sentiment.mean(),
            per_source_stats,
            top_sources,
            top_keywords,
            competitor_stats,
            target,
            leaderboard,
            comparisons: ComparisonStats {
                total: self.comparisons.count,
                average_sentiment: self.comparisons.mean(),
            },
            yes_no: self.yes_no.clone(),
        }
    }
}

/// Compares average positions exactly by cross-multiplying.
fn compare_average_position(a: &RankTally, b: &RankTally) -> Ordering {
    (a.position_sum * b.appearances).cmp(&(b.position_sum * a.appearances))
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Folds a whole sequence of analyzed documents into one summary.
pub fn aggregate<'a, I>(brands: &CompetitorSet, docs: I) -> BatchSummary
where
    I: IntoIterator<Item = &'a AnalyzedDocument>,
{
    let mut acc = BatchAccumulator::new(brands);
    for doc in docs {
        acc.add(doc);
    }
    acc.finish()
}
