use regex::RegexBuilder;

use crate::error::DocumentAnalysisError;
use crate::models::ComparisonSnippet;
use crate::sentiment;
use crate::text::{brand_alternation, brand_pattern};

const COMPARATIVE: &str = r"\b(?:vs|versus|compared\s+to|against)\b";

/// Every "target vs competitor" and "competitor vs target" span on a single
/// line, each scored on its own. Target-first matches come before
/// competitor-first ones; nothing is deduplicated.
pub fn find_comparisons<S: AsRef<str>>(
    text: &str,
    target_company: &str,
    competitors: &[S],
) -> Result<Vec<ComparisonSnippet>, DocumentAnalysisError> {
    let target = target_company.trim();
    let Some(rivals) = brand_alternation(competitors) else {
        return Ok(Vec::new());
    };
    if target.is_empty() {
        return Ok(Vec::new());
    }
    let target = brand_pattern(target);

    let directions = [
        format!("{target}.*?{COMPARATIVE}.*?{rivals}"),
        format!("{rivals}.*?{COMPARATIVE}.*?{target}"),
    ];

    let mut snippets = Vec::new();
    for pattern in &directions {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| DocumentAnalysisError::pattern(target_company, e))?;
        for m in re.find_iter(text) {
            let span = m.as_str().trim();
            snippets.push(ComparisonSnippet {
                text: span.to_string(),
                sentiment: sentiment::score(span),
            });
        }
    }
    Ok(snippets)
}
