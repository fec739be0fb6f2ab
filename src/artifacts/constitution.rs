//! Grammar for the project constitution (constitution.md)
//!
//! Principles are `###` headings under `## Core Principles`; every other
//! `##` heading becomes a generic section with its own `###` subsections.
//! Generator scaffolding leaves literal `[BRACKETED_NAME]` headings behind
//! when a slot was never filled; those are filtered out everywhere since they
//! are not content. HTML comments never reach the extracted text. The one
//! exception is the leading Sync Impact Report comment, which is parsed into
//! its own record before being discarded.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::markdown::{find_section, get_subsections, parse_sections, render_blocks, Section};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstitutionPrinciple {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstitutionSubsection {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstitutionSection {
    pub name: String,
    pub content: String,
    pub subsections: Vec<ConstitutionSubsection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateStatus {
    pub template: String,
    pub status: String,
}

/// The change log embedded in the constitution's leading comment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SyncImpactReport {
    pub version_change: Option<String>,
    pub modified_principles: Option<String>,
    pub added_sections: Vec<String>,
    pub removed_sections: Vec<String>,
    pub templates_status: Vec<TemplateStatus>,
    pub follow_up_todos: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constitution {
    pub raw_content: String,
    pub title: Option<String>,
    pub principles: Vec<ConstitutionPrinciple>,
    pub sections: Vec<ConstitutionSection>,
    pub version: Option<String>,
    pub ratified_date: Option<String>,
    pub last_amended_date: Option<String>,
    pub sync_impact_report: Option<SyncImpactReport>,
}

static LEADING_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<!--([\s\S]*?)-->").expect("leading comment pattern"));

static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Version\*\*:\s*([^\s|]+)").expect("version pattern"));

static RATIFIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Ratified\*\*:\s*([^\s|]+)").expect("ratified pattern"));

static AMENDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*Last Amended\*\*:\s*([^\s|]+)").expect("amended pattern"));

/// Parse constitution.md. Total for any input.
pub fn parse_constitution(text: &str) -> Constitution {
    let sections = parse_sections(text);

    let title = sections
        .iter()
        .find(|section| section.depth == 1)
        .map(|section| section.title.clone());

    let core = find_section(&sections, "Core Principles");
    let principles = core
        .map(|core| parse_principles(core, &sections))
        .unwrap_or_default();

    let generic_sections = sections
        .iter()
        .filter(|section| section.depth == 2)
        .filter(|section| !is_placeholder(&section.title))
        .filter(|section| match core {
            Some(core) => !std::ptr::eq(*section, core),
            None => true,
        })
        .map(|section| ConstitutionSection {
            name: section.title.clone(),
            content: render_blocks(&section.children),
            subsections: get_subsections(section, &sections)
                .into_iter()
                .filter(|subsection| !is_placeholder(&subsection.title))
                .map(|subsection| ConstitutionSubsection {
                    name: subsection.title.clone(),
                    content: render_blocks(&subsection.children),
                })
                .collect(),
        })
        .collect();

    Constitution {
        raw_content: text.to_string(),
        title,
        principles,
        sections: generic_sections,
        version: VERSION
            .captures(text)
            .map(|captures| captures[1].trim().to_string()),
        ratified_date: RATIFIED
            .captures(text)
            .map(|captures| captures[1].trim().to_string()),
        last_amended_date: AMENDED
            .captures(text)
            .map(|captures| captures[1].trim().to_string()),
        sync_impact_report: parse_sync_impact_report(text),
    }
}

fn is_placeholder(name: &str) -> bool {
    name.trim_start().starts_with('[')
}

fn parse_principles(core: &Section, all: &[Section]) -> Vec<ConstitutionPrinciple> {
    get_subsections(core, all)
        .into_iter()
        .filter(|subsection| !is_placeholder(&subsection.title))
        .map(|subsection| ConstitutionPrinciple {
            name: subsection.title.clone(),
            description: render_blocks(&subsection.children),
        })
        .collect()
}

// ---- Sync Impact Report -------------------------------------------------

static LABEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[\s\-*]*([A-Za-z][A-Za-z \-]*?):\s*(.*)$").expect("label line"));

static BULLET_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*]\s+(.+)$").expect("bullet line"));

static KNOWN_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[\s\-*]*(version change|modified principles|added sections|removed sections|templates|follow-up)",
    )
    .expect("known label pattern")
});

/// Parse the `Sync Impact Report` comment block, if present.
///
/// The report is a loose key/value-and-bullet-list dialect. Labels are
/// matched case-insensitively; list-valued labels accept an inline
/// comma-separated value or indented bullets on the following lines; "none"
/// reads as empty.
pub fn parse_sync_impact_report(text: &str) -> Option<SyncImpactReport> {
    let comment = LEADING_COMMENT.captures(text)?;
    let body = &comment[1];
    if !body.to_lowercase().contains("sync impact report") {
        return None;
    }

    let mut report = SyncImpactReport::default();
    let lines: Vec<&str> = body.lines().collect();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        index += 1;

        let Some(captures) = LABEL_LINE.captures(line) else {
            continue;
        };
        let label = captures[1].trim().to_lowercase();
        let inline = captures[2].trim().to_string();

        match label.as_str() {
            "version change" => {
                report.version_change = non_empty(inline);
            }
            "modified principles" => {
                report.modified_principles = non_empty(inline);
            }
            "added sections" => {
                report.added_sections = list_values(inline, &lines, &mut index);
            }
            "removed sections" => {
                report.removed_sections = list_values(inline, &lines, &mut index);
            }
            label if label.starts_with("templates") => {
                for value in list_values(inline, &lines, &mut index) {
                    report.templates_status.push(match value.split_once(':') {
                        Some((status, template)) => TemplateStatus {
                            template: template.trim().to_string(),
                            status: status.trim().to_string(),
                        },
                        None => TemplateStatus {
                            template: value,
                            status: String::new(),
                        },
                    });
                }
            }
            label if label.starts_with("follow-up") => {
                report.follow_up_todos = non_empty(inline);
            }
            _ => {}
        }
    }

    Some(report)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A label's values: the inline remainder (comma-separated) and/or the
/// indented bullets that follow it.
fn list_values(inline: String, lines: &[&str], index: &mut usize) -> Vec<String> {
    let mut values = Vec::new();
    if !inline.is_empty() && !inline.eq_ignore_ascii_case("none") {
        values.extend(
            inline
                .split(',')
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
        );
    }
    while *index < lines.len() {
        let line = lines[*index];
        // The next report label may itself be written as a bullet; it ends
        // this label's value list rather than joining it.
        if KNOWN_LABEL.is_match(line) {
            break;
        }
        let Some(captures) = BULLET_LINE.captures(line) else {
            break;
        };
        values.push(captures[1].trim().to_string());
        *index += 1;
    }
    values
}
