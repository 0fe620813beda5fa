use std::collections::BTreeMap;

use regex::RegexBuilder;

use crate::config::HP;
use crate::error::DocumentAnalysisError;
use crate::models::{MentionRecord, Mentions};
use crate::text::{brand_pattern, line_context};

/// Whole-word, case-insensitive mention counts per brand, with a few
/// distinct context snippets each. Brands that never occur are left out of
/// the result.
pub fn detect_mentions<S: AsRef<str>>(
    text: &str,
    brands: &[S],
) -> Result<Mentions, DocumentAnalysisError> {
    let mut out: BTreeMap<String, MentionRecord> = BTreeMap::new();
    for brand in brands {
        let brand = brand.as_ref().trim();
        if brand.is_empty() || out.contains_key(brand) {
            continue;
        }
        let re = RegexBuilder::new(&brand_pattern(brand))
            .case_insensitive(true)
            .build()
            .map_err(|e| DocumentAnalysisError::pattern(brand, e))?;

        let mut record = MentionRecord::default();
        for m in re.find_iter(text) {
            record.count += 1;
            if record.contexts.len() < HP.context_sample_cap {
                let ctx = line_context(text, m.start(), m.end(), HP.context_window_chars).trim();
                if !record.contexts.iter().any(|c| c == ctx) {
                    record.contexts.push(ctx.to_string());
                }
            }
        }
        if record.count > 0 {
            out.insert(brand.to_string(), record);
        }
    }
    Ok(Mentions(out))
}
