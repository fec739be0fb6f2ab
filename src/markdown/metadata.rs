//! Bold-label metadata extraction (`**Key**: value`)
//!
//! Planning documents carry their metadata as bold-prefixed lines in the
//! region between the document title and the first `##` heading. Lookups are
//! restricted to that header region: documents further down frequently
//! *describe* the metadata pattern in their own prose or code samples, and
//! matching there produces false positives.
//!
//! Keys are matched case-insensitively; a missing key is `None`, never an
//! error.

use once_cell::sync::Lazy;
use regex::Regex;

static METADATA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\*\*([^*\n]+)\*\*:\s*(.+)$").expect("metadata pattern"));

static H2_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^##\s").expect("heading pattern"));

/// The document text up to (not including) the first `##` heading line.
///
/// Fenced code is skipped when looking for that heading, so a `##` inside an
/// example block does not end the region early.
pub fn header_region(text: &str) -> String {
    let mut region = String::new();
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            region.push_str(line);
            region.push('\n');
            continue;
        }
        if !in_fence && H2_LINE.is_match(line) {
            break;
        }
        region.push_str(line);
        region.push('\n');
    }
    region
}

/// The header region with fenced lines removed; metadata lookups run over
/// this so example text inside a fence is never matched.
fn metadata_region(text: &str) -> String {
    let mut out = String::new();
    let mut fenced = false;

    for line in header_region(text).lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            fenced = !fenced;
            continue;
        }
        if !fenced {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// All `**Key**: value` pairs from the header region, in order.
pub fn extract_metadata(text: &str) -> Vec<(String, String)> {
    let region = metadata_region(text);
    let mut pairs = Vec::new();

    for line in region.lines() {
        if let Some(captures) = METADATA_LINE.captures(line) {
            pairs.push((
                captures[1].trim().to_string(),
                captures[2].trim().to_string(),
            ));
        }
    }
    pairs
}

/// Look up one metadata key in the header region.
pub fn extract_metadata_value(text: &str, key: &str) -> Option<String> {
    let pattern = format!(r"(?i)\*\*{}\*\*:\s*([^\n]+)", regex::escape(key));
    let regex = Regex::new(&pattern).ok()?;
    let region = metadata_region(text);
    regex
        .captures(&region)
        .map(|captures| captures[1].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_key_case_insensitively() {
        let text = "# Title\n\n**Feature**: Task board\n**Date**: 2026-01-03\n";
        assert_eq!(
            extract_metadata_value(text, "feature").as_deref(),
            Some("Task board")
        );
        assert_eq!(
            extract_metadata_value(text, "Date").as_deref(),
            Some("2026-01-03")
        );
    }

    #[test]
    fn ignores_keys_after_first_heading() {
        let text = "# Title\n\n**Real**: yes\n\n## Docs\n\n**Decoy**: no\n";
        assert_eq!(extract_metadata_value(text, "Real").as_deref(), Some("yes"));
        assert_eq!(extract_metadata_value(text, "Decoy"), None);
    }

    #[test]
    fn ignores_keys_inside_code_fences() {
        let text = "```md\n**Sample**: value\n```\n\n**Key**: real\n";
        assert_eq!(
            extract_metadata(text),
            vec![("Key".to_string(), "real".to_string())]
        );
        assert_eq!(extract_metadata_value(text, "Sample"), None);
        assert_eq!(extract_metadata_value(text, "Key").as_deref(), Some("real"));
    }

    #[test]
    fn fenced_heading_does_not_end_region() {
        let text = "Intro\n\n```md\n## fake heading\n```\n\n**After**: kept\n\n## Real\n";
        assert_eq!(
            extract_metadata_value(text, "After").as_deref(),
            Some("kept")
        );
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(extract_metadata_value("no metadata here", "Branch"), None);
        assert!(extract_metadata("").is_empty());
    }
}
