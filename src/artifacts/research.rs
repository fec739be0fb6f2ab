//! Grammar for research notes (research.md)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{collect_other_sections, OtherSection};
use crate::markdown::{
    extract_metadata_value, extract_simple_list, find_section_any, get_subsections, parse_sections,
    ContentNode, Section,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alternative {
    pub name: String,
    pub reason: String,
}

/// One `### N. Title` technology decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnologyDecision {
    pub id: u32,
    pub title: String,
    pub decision: String,
    pub rationale: Vec<String>,
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedResearch {
    pub raw_content: String,
    pub feature: Option<String>,
    pub date: Option<String>,
    pub technology_decisions: Vec<TechnologyDecision>,
    pub other_sections: Vec<OtherSection>,
}

const KNOWN_SECTIONS: &[&str] = &["technology decisions"];

static NUMBERED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s*(.+)$").expect("numbered title pattern"));

static DECISION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\*\*)?Decision(?:\*\*)?:\s*(.+)$").expect("decision pattern")
});

static RATIONALE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\*\*)?Rationale(?:\*\*)?:").expect("rationale pattern")
});

static ALTERNATIVES_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\*\*)?Alternatives Considered(?:\*\*)?:").expect("alternatives pattern")
});

static NAME_REASON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]+):\s*(.+)$").expect("name reason pattern"));

/// Parse research.md. Total for any input.
pub fn parse_research(text: &str) -> ParsedResearch {
    let sections = parse_sections(text);

    ParsedResearch {
        raw_content: text.to_string(),
        feature: extract_metadata_value(text, "Feature"),
        date: extract_metadata_value(text, "Date"),
        technology_decisions: parse_decisions(&sections),
        other_sections: collect_other_sections(&sections, KNOWN_SECTIONS),
    }
}

fn parse_decisions(sections: &[Section]) -> Vec<TechnologyDecision> {
    let Some(section) = find_section_any(sections, &["technology decisions"]) else {
        return Vec::new();
    };

    let mut decisions = Vec::new();
    for subsection in get_subsections(section, sections) {
        let Some(captures) = NUMBERED_TITLE.captures(&subsection.title) else {
            continue;
        };
        let Ok(id) = captures[1].parse::<u32>() else {
            continue;
        };

        let mut decision = TechnologyDecision {
            id,
            title: captures[2].trim().to_string(),
            decision: String::new(),
            rationale: Vec::new(),
            alternatives: Vec::new(),
        };

        // The body alternates label paragraphs and their bullet lists.
        #[derive(PartialEq)]
        enum Pending {
            None,
            Rationale,
            Alternatives,
        }
        let mut pending = Pending::None;

        for node in &subsection.children {
            match node {
                ContentNode::Paragraph { text } => {
                    let trimmed = text.trim();
                    if let Some(captures) = DECISION.captures(trimmed) {
                        decision.decision = captures[1].trim().to_string();
                        pending = Pending::None;
                    } else if RATIONALE_LABEL.is_match(trimmed) {
                        pending = Pending::Rationale;
                    } else if ALTERNATIVES_LABEL.is_match(trimmed) {
                        pending = Pending::Alternatives;
                    }
                }
                ContentNode::List(_) => {
                    let items = extract_simple_list(std::slice::from_ref(node));
                    match pending {
                        Pending::Rationale => decision.rationale = items,
                        Pending::Alternatives => {
                            decision.alternatives = items
                                .into_iter()
                                .map(|item| match NAME_REASON.captures(&item) {
                                    Some(captures) => Alternative {
                                        name: captures[1].trim().to_string(),
                                        reason: captures[2].trim().to_string(),
                                    },
                                    None => Alternative {
                                        name: item,
                                        reason: String::new(),
                                    },
                                })
                                .collect();
                        }
                        Pending::None => {}
                    }
                    pending = Pending::None;
                }
                _ => {}
            }
        }

        decisions.push(decision);
    }

    decisions
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESEARCH: &str = "# Research\n\n**Feature**: Board\n**Date**: 2026-01-03\n\n## Technology Decisions\n\n### 1. State Management\n\n**Decision**: Zustand\n\n**Rationale**:\n\n- Small API surface\n- No boilerplate\n\n**Alternatives Considered**:\n\n- Redux: too heavy for this scope\n- Context: rerender storms\n\n### 2. Styling\n\n**Decision**: Tailwind\n\n## Open Threads\n\nStill investigating sync.\n";

    #[test]
    fn decisions_with_rationale_and_alternatives() {
        let research = parse_research(RESEARCH);
        assert_eq!(research.technology_decisions.len(), 2);

        let first = &research.technology_decisions[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.title, "State Management");
        assert_eq!(first.decision, "Zustand");
        assert_eq!(first.rationale, vec!["Small API surface", "No boilerplate"]);
        assert_eq!(
            first.alternatives[0],
            Alternative {
                name: "Redux".to_string(),
                reason: "too heavy for this scope".to_string(),
            }
        );
    }

    #[test]
    fn unnumbered_subsections_are_skipped() {
        let research = parse_research("## Technology Decisions\n\n### Unnumbered\n\nText.\n");
        assert!(research.technology_decisions.is_empty());
    }

    #[test]
    fn leftover_sections_are_kept() {
        let research = parse_research(RESEARCH);
        assert_eq!(research.other_sections.len(), 1);
        assert_eq!(research.other_sections[0].title, "Open Threads");
    }
}
