//! Ranking extraction.
//!
//! Two strategies run in a fixed order and the first one that finds anything
//! wins:
//!
//! 1. [`explicit_section`]: a "Forced Ranking" heading followed by a numbered
//!    list (`1. Acme`, `## 2. **Beta**`).
//! 2. [`prose_order`]: first-occurrence order of the known company names
//!    anywhere in the text.
//!
//! Finding nothing is a valid outcome, reported as [`RankingMethod::NotFound`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::DocumentAnalysisError;
use crate::models::{RankedCompany, RankingMethod, RankingResult};
use crate::text::{brand_alternation, eq_ignore_case};

static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*[#*]*[ \t]*forced[ \t]+ranking\b[^\n]*$").unwrap()
});

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(?:#+[ \t]*)?(\d+)\.[ \t]+(.+?)[ \t]*$").unwrap());

static BOLD_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\*\*[^*]+\*\*:?\s*$").unwrap());

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

pub fn extract_ranking<S: AsRef<str>>(
    text: &str,
    target_company: &str,
    competitors: &[S],
) -> Result<RankingResult, DocumentAnalysisError> {
    let names = explicit_section(text);
    if !names.is_empty() {
        debug!("Ranking from explicit section - items={}", names.len());
        return Ok(build_result(RankingMethod::ExplicitSection, names, target_company));
    }

    let mut known: Vec<&str> = vec![target_company];
    known.extend(competitors.iter().map(|c| c.as_ref()));
    let names = prose_order(text, &known)?;
    if !names.is_empty() {
        debug!("Ranking from prose order - items={}", names.len());
        return Ok(build_result(RankingMethod::ProseOrder, names, target_company));
    }

    Ok(RankingResult::not_found())
}

fn build_result(method: RankingMethod, names: Vec<String>, target_company: &str) -> RankingResult {
    let entries: Vec<RankedCompany> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| RankedCompany {
            position: i + 1,
            name,
        })
        .collect();
    let target_position = entries
        .iter()
        .find(|e| eq_ignore_case(&e.name, target_company))
        .map(|e| e.position);
    RankingResult {
        method,
        entries,
        target_position,
    }
}

// ---------------------------------------------------------------------------
// Explicit "Forced Ranking" section
// ---------------------------------------------------------------------------

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_item(line: &str) -> bool {
    ITEM_RE.is_match(line)
}

/// A `#` heading that isn't a numbered item, or a line that is nothing but
/// bold text (`**Key factors**`).
fn is_heading(line: &str) -> bool {
    (line.trim_start().starts_with('#') && !is_item(line)) || BOLD_HEADING_RE.is_match(line)
}

fn indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Lines of the ranking block: from the first non-blank line after the
/// heading up to the next heading or blank line.
fn ranking_block(text: &str) -> Option<Vec<&str>> {
    let heading = HEADING_RE.find(text)?;
    let block = text[heading.end()..]
        .lines()
        .skip_while(|l| is_blank(l))
        .take_while(|l| !is_blank(l) && !is_heading(l))
        .collect();
    Some(block)
}

/// Company name of a numbered list line: bold text if present, else the rest
/// of the line.
fn item_name(line: &str) -> Option<String> {
    let caps = ITEM_RE.captures(line)?;
    let rest = caps.get(2)?.as_str();
    let raw = match BOLD_RE.captures(rest) {
        Some(bold) => bold.get(1).map_or(rest, |m| m.as_str()),
        None => rest,
    };
    let name = raw
        .trim()
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim_end_matches(':')
        .trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Company names of the explicit ranking section in list order, repeats
/// (case-insensitive) dropped.
pub fn explicit_section(text: &str) -> Vec<String> {
    let Some(block) = ranking_block(text) else {
        return Vec::new();
    };
    // nested sub-lists sit deeper than the first item
    let Some(top) = block.iter().find(|l| is_item(l)).map(|l| indent(l)) else {
        return Vec::new();
    };
    let mut names: Vec<String> = Vec::new();
    for name in block
        .into_iter()
        .filter(|l| indent(l) == top)
        .filter_map(item_name)
    {
        if !names.iter().any(|n| eq_ignore_case(n, &name)) {
            names.push(name);
        }
    }
    names
}

// ---------------------------------------------------------------------------
// Prose fallback
// ---------------------------------------------------------------------------

/// Known company names in order of first occurrence. A name directly followed
/// by `:` counts like any other whole-word match.
pub fn prose_order<S: AsRef<str>>(
    text: &str,
    known: &[S],
) -> Result<Vec<String>, DocumentAnalysisError> {
    let Some(alt) = brand_alternation(known) else {
        return Ok(Vec::new());
    };
    let re = RegexBuilder::new(&alt)
        .case_insensitive(true)
        .build()
        .map_err(|e| DocumentAnalysisError::pattern(alt.clone(), e))?;

    let canonical: HashMap<String, &str> = known
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .map(|n| (n.to_lowercase(), n))
        .collect();

    let mut names: Vec<String> = Vec::new();
    for m in re.find_iter(text) {
        let key = m.as_str().to_lowercase();
        let name = canonical.get(&key).copied().unwrap_or(m.as_str());
        if !names.iter().any(|n| eq_ignore_case(n, name)) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_skips_blank_lines_after_heading() {
        let text = "## Forced Ranking\n\n1. Acme\n2. Beta\n\nSome closing prose.";
        assert_eq!(ranking_block(text).unwrap(), ["1. Acme", "2. Beta"]);
    }

    #[test]
    fn block_ends_at_first_blank_line() {
        let text = "**Forced Ranking:**\n1. Acme\n   - cheap\n\n2. Beta\n";
        assert_eq!(ranking_block(text).unwrap(), ["1. Acme", "   - cheap"]);
    }

    #[test]
    fn bold_only_line_is_a_boundary() {
        let text = "## Forced Ranking\n1. Acme\n**Why:**\n1. Price";
        assert_eq!(ranking_block(text).unwrap(), ["1. Acme"]);
        assert!(is_heading("  **Key factors**  "));
        assert!(!is_heading("1. **Acme**"));
    }

    #[test]
    fn nested_items_are_not_companies() {
        let text = "# Forced Ranking\n  1. **Acme**\n     1. Cheap\n  2. Beta";
        assert_eq!(explicit_section(text), ["Acme", "Beta"]);
    }

    #[test]
    fn heading_style_items_are_not_boundaries() {
        let text = "# Forced Ranking\n## 1. **Acme**\n## 2. Beta\n## Summary";
        assert_eq!(explicit_section(text), ["Acme", "Beta"]);
    }

    #[test]
    fn item_name_prefers_bold_text() {
        assert_eq!(item_name("1. **Acme Cloud** - best overall").unwrap(), "Acme Cloud");
        assert_eq!(item_name("2. **Beta:** solid").unwrap(), "Beta");
        assert_eq!(item_name("3. Gamma").unwrap(), "Gamma");
        assert!(item_name("- Delta").is_none());
    }

    #[test]
    fn no_heading_means_no_block() {
        assert!(ranking_block("1. Acme\n2. Beta").is_none());
    }
}
