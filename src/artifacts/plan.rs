//! Grammar for the technical plan (plan.md)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{collect_other_sections, OtherSection};
use crate::markdown::{
    extract_blockquote, extract_code_blocks, extract_metadata_value, extract_tables, extract_text,
    find_section_any, get_subsections, header_region, parse_sections, ContentNode, Section,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanMetadata {
    pub branch: Option<String>,
    pub date: Option<String>,
    pub spec_link: Option<String>,
    pub input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstitutionCheckItem {
    pub principle: String,
    pub requirement: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstitutionCheck {
    pub items: Vec<ConstitutionCheckItem>,
    pub note: Option<String>,
}

/// One directory-tree subsection of "Project Structure".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStructureItem {
    pub title: String,
    pub code_block: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityItem {
    pub aspect: String,
    pub decision: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityTracking {
    pub items: Vec<ComplexityItem>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedPlan {
    pub raw_content: String,
    pub metadata: PlanMetadata,
    pub summary: Option<String>,
    pub technical_context: Vec<(String, String)>,
    pub constitution_check: ConstitutionCheck,
    pub quality_gates: Vec<String>,
    pub project_structure: Vec<ProjectStructureItem>,
    pub complexity_tracking: ComplexityTracking,
    pub other_sections: Vec<OtherSection>,
}

const KNOWN_SECTIONS: &[&str] = &[
    "summary",
    "technical context",
    "constitution check",
    "quality gates",
    "project structure",
    "complexity tracking",
];

static BRANCH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Branch\*\*:\s*`([^`]+)`").expect("branch pattern"));

static SPEC_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\*\*Spec\*\*:\s*\[([^\]]+)\]\(([^)]+)\)").expect("spec link pattern")
});

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Date\*\*:\s*(\d{4}-\d{2}-\d{2})").expect("date pattern"));

static KEY_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*([^*]+)\*\*:\s*(.+)$").expect("key value pattern"));

static QUALITY_GATES_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\*\*Quality Gates\*\*:").expect("quality gates pattern"));

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-\s+(.+)$").expect("bullet pattern"));

/// Parse plan.md. Total for any input.
pub fn parse_plan(text: &str) -> ParsedPlan {
    let sections = parse_sections(text);

    ParsedPlan {
        raw_content: text.to_string(),
        metadata: parse_metadata(text),
        summary: parse_summary(&sections),
        technical_context: parse_technical_context(&sections),
        constitution_check: parse_constitution_check(&sections),
        quality_gates: parse_quality_gates(text),
        project_structure: parse_project_structure(&sections),
        complexity_tracking: parse_complexity_tracking(&sections),
        other_sections: collect_other_sections(&sections, KNOWN_SECTIONS),
    }
}

fn parse_metadata(text: &str) -> PlanMetadata {
    let header = header_region(text);
    PlanMetadata {
        // Branch values are backtick-quoted in plans.
        branch: BRANCH
            .captures(&header)
            .map(|captures| captures[1].trim().to_string()),
        // Dates share their line with other keys, so the value is matched by
        // shape rather than read to end of line.
        date: DATE
            .captures(&header)
            .map(|captures| captures[1].to_string()),
        spec_link: SPEC_LINK
            .captures(&header)
            .map(|captures| captures[2].trim().to_string()),
        input: extract_metadata_value(text, "Input"),
    }
}

fn parse_summary(sections: &[Section]) -> Option<String> {
    let section = find_section_any(sections, &["summary"])?;
    let text = extract_text(&section.children);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_technical_context(sections: &[Section]) -> Vec<(String, String)> {
    let Some(section) = find_section_any(sections, &["technical context"]) else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for node in &section.children {
        if let ContentNode::Paragraph { text } = node {
            for line in text.lines() {
                if let Some(captures) = KEY_VALUE.captures(line.trim()) {
                    pairs.push((
                        captures[1].trim().to_string(),
                        captures[2].trim().to_string(),
                    ));
                }
            }
        }
    }
    pairs
}

fn table_triples(section: &Section) -> Vec<[String; 3]> {
    let tables = extract_tables(&section.children);
    let Some(table) = tables.first() else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .filter(|row| row.len() >= 3)
        .map(|row| [row[0].clone(), row[1].clone(), row[2].clone()])
        .collect()
}

fn parse_constitution_check(sections: &[Section]) -> ConstitutionCheck {
    let Some(section) = find_section_any(sections, &["constitution check"]) else {
        return ConstitutionCheck {
            items: Vec::new(),
            note: None,
        };
    };

    let items = table_triples(section)
        .into_iter()
        .map(|[principle, requirement, status]| ConstitutionCheckItem {
            principle,
            requirement,
            status,
        })
        .collect();

    ConstitutionCheck {
        items,
        note: extract_blockquote(&section.children),
    }
}

/// Quality gates hang off a bold label rather than a heading, so this one
/// works on raw lines: everything bulleted between the label and the next
/// `##` heading.
fn parse_quality_gates(text: &str) -> Vec<String> {
    let Some(label) = QUALITY_GATES_LABEL.find(text) else {
        return Vec::new();
    };

    let mut gates = Vec::new();
    for line in text[label.end()..].lines() {
        if line.starts_with("## ") {
            break;
        }
        if let Some(captures) = BULLET.captures(line) {
            gates.push(captures[1].trim().to_string());
        }
    }
    gates
}

fn parse_project_structure(sections: &[Section]) -> Vec<ProjectStructureItem> {
    let Some(section) = find_section_any(sections, &["project structure"]) else {
        return Vec::new();
    };

    get_subsections(section, sections)
        .into_iter()
        .map(|subsection| {
            let code_blocks = extract_code_blocks(&subsection.children);
            let code_block = code_blocks
                .first()
                .map(|block| block.code.trim_end().to_string())
                .unwrap_or_default();
            let text = extract_text(&subsection.children);
            ProjectStructureItem {
                title: subsection.title.clone(),
                code_block,
                description: if text.is_empty() { None } else { Some(text) },
            }
        })
        .collect()
}

fn parse_complexity_tracking(sections: &[Section]) -> ComplexityTracking {
    let Some(section) = find_section_any(sections, &["complexity tracking"]) else {
        return ComplexityTracking {
            items: Vec::new(),
            note: None,
        };
    };

    let items = table_triples(section)
        .into_iter()
        .map(|[aspect, decision, rationale]| ComplexityItem {
            aspect,
            decision,
            rationale,
        })
        .collect();

    ComplexityTracking {
        items,
        note: extract_blockquote(&section.children),
    }
}
