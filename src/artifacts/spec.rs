//! Grammar for the feature specification (spec.md)
//!
//! The richest artifact: header metadata, prioritized user stories with
//! Given/When/Then acceptance scenarios, clarification Q&A sessions, edge
//! cases, grouped functional requirements, and key entities. Section wording
//! drifts between authors ("User Scenarios" vs "User Stories"), so every
//! lookup goes through a synonym vocabulary.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{collect_other_sections, OtherSection};
use crate::markdown::{
    extract_list_items, find_section_any, get_subsections, header_region, parse_sections, Section,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecMetadata {
    pub title: Option<String>,
    pub branch: Option<String>,
    pub created: Option<String>,
    pub status: Option<String>,
    pub input: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptanceScenario {
    pub given: String,
    pub when: String,
    pub then: String,
}

/// A `### User Story N - Title (Priority: Pn)` block.
///
/// Priority stays an open string (`P1`, `P2`, ... with no fixed upper bound);
/// documents that drift from the convention simply produce no story rather
/// than a guessed one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStory {
    pub id: String,
    pub title: String,
    pub priority: String,
    pub description: String,
    pub why_priority: Option<String>,
    pub independent_test: Option<String>,
    pub acceptance_scenarios: Vec<AcceptanceScenario>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clarification {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClarificationSession {
    /// `YYYY-MM-DD`, taken from the session heading.
    pub date: String,
    pub clarifications: Vec<Clarification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeCase {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    pub id: String,
    pub text: String,
}

/// Requirements under one bold category header; `category` is `None` for
/// items appearing before any header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementGroup {
    pub category: Option<String>,
    pub requirements: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyEntity {
    pub name: String,
    pub description: String,
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSpec {
    pub raw_content: String,
    pub metadata: SpecMetadata,
    pub user_stories: Vec<UserStory>,
    pub clarifications: Vec<ClarificationSession>,
    pub edge_cases: Vec<EdgeCase>,
    pub requirements: Vec<RequirementGroup>,
    pub key_entities: Vec<KeyEntity>,
    pub other_sections: Vec<OtherSection>,
}

const KNOWN_SECTIONS: &[&str] = &[
    "user scenarios",
    "user stories",
    "clarifications",
    "requirements",
    "key entities",
    "edge cases",
];

const CLARIFICATION_TITLES: &[&str] = &["clarifications"];
const REQUIREMENT_TITLES: &[&str] = &["functional requirements", "requirements"];
const ENTITY_TITLES: &[&str] = &["key entities"];
const EDGE_CASE_TITLES: &[&str] = &["edge cases"];

static STORY_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^User Story\s*(\d+)\s*[\-–]\s*(.*?)\s*\(Priority:\s*(P\d+)\)")
        .expect("story title pattern")
});

static SCENARIO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*Given\*\*\s*(.+?),\s*\*\*When\*\*\s*(.+?),\s*\*\*Then\*\*\s*(.+)")
        .expect("scenario pattern")
});

static SESSION_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Session\s+(\d{4}-\d{2}-\d{2})").expect("session pattern"));

static QA_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Q:\s*(.+?)\s*(?:→|->)\s*A:\s*(.+)$").expect("clarification pattern")
});

static CATEGORY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*([^*]+)\*\*:?\s*$").expect("category pattern"));

static REQUIREMENT_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*([A-Za-z]+-\d+)\*\*:\s*(.+)").expect("requirement pattern"));

static ENTITY_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\*\*(.+?)\*\*:?\s*(.*)$").expect("entity pattern"));

static BOLD_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\*([^*]+)\*\*:\s*(.*)").expect("bold field pattern"));

/// Parse spec.md. Total for any input.
pub fn parse_spec(text: &str) -> ParsedSpec {
    let sections = parse_sections(text);

    ParsedSpec {
        raw_content: text.to_string(),
        metadata: parse_metadata(text, &sections),
        user_stories: parse_user_stories(&sections),
        clarifications: parse_clarifications(&sections),
        edge_cases: parse_edge_cases(&sections),
        requirements: parse_requirements(&sections),
        key_entities: parse_key_entities(&sections),
        other_sections: collect_other_sections(&sections, KNOWN_SECTIONS),
    }
}

fn parse_metadata(text: &str, sections: &[Section]) -> SpecMetadata {
    let title = sections
        .iter()
        .find(|section| section.depth == 1)
        .map(|section| {
            section
                .title
                .trim_start_matches("Feature Specification:")
                .trim()
                .to_string()
        });

    // The header line often carries several keys at once
    // (`**Feature Branch**: `x` **Created**: d **Status**: s`), so each value
    // stops at the next bold marker rather than the end of line.
    let header = header_region(text);
    let field = |pattern: &str| -> Option<String> {
        Regex::new(pattern)
            .ok()
            .and_then(|regex| regex.captures(&header))
            .map(|captures| captures[1].trim().to_string())
            .filter(|value| !value.is_empty())
    };

    SpecMetadata {
        title,
        branch: field(r"(?i)\*\*(?:Feature\s+)?Branch\*\*:\s*`?([^`*\n]+)"),
        created: field(r"(?i)\*\*Created\*\*:\s*([^*\n]+)"),
        status: field(r"(?i)\*\*Status\*\*:\s*([^*\n]+)"),
        input: field(r"(?i)\*\*Input\*\*:\s*([^\n]+)"),
    }
}

fn parse_user_stories(sections: &[Section]) -> Vec<UserStory> {
    let mut stories = Vec::new();

    for section in sections {
        let Some(captures) = STORY_TITLE.captures(&section.title) else {
            continue;
        };

        let mut story = UserStory {
            id: format!("US{}", &captures[1]),
            title: captures[2].trim().to_string(),
            priority: captures[3].to_uppercase(),
            description: String::new(),
            why_priority: None,
            independent_test: None,
            acceptance_scenarios: Vec::new(),
        };

        let mut description = Vec::new();
        let mut in_scenarios = false;

        for node in &section.children {
            match node {
                crate::markdown::ContentNode::Paragraph { text } => {
                    if let Some(captures) = BOLD_FIELD.captures(text) {
                        let label = captures[1].trim().to_lowercase();
                        let value = captures[2].trim().to_string();
                        if label.contains("why this priority") {
                            story.why_priority = Some(value);
                            continue;
                        }
                        if label.contains("independent test") {
                            story.independent_test = Some(value);
                            continue;
                        }
                        if label.contains("acceptance scenarios") {
                            in_scenarios = true;
                            continue;
                        }
                    }
                    if text.contains("**Acceptance Scenarios**") {
                        in_scenarios = true;
                    } else if !in_scenarios {
                        description.push(text.as_str());
                    }
                }
                crate::markdown::ContentNode::List(list) => {
                    if in_scenarios {
                        for item in &list.items {
                            if let Some(scenario) = parse_scenario(&item.text) {
                                story.acceptance_scenarios.push(scenario);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        // Scenarios may also sit under their own nested heading.
        for subsection in get_subsections(section, sections) {
            if subsection.title.to_lowercase().contains("acceptance") {
                for item in extract_list_items(&subsection.children) {
                    if let Some(scenario) = parse_scenario(&item.text) {
                        story.acceptance_scenarios.push(scenario);
                    }
                }
            }
        }

        story.description = description.join("\n\n");
        stories.push(story);
    }

    stories
}

fn parse_scenario(text: &str) -> Option<AcceptanceScenario> {
    SCENARIO.captures(text).map(|captures| AcceptanceScenario {
        given: captures[1].trim().to_string(),
        when: captures[2].trim().to_string(),
        then: captures[3].trim().to_string(),
    })
}

fn parse_clarifications(sections: &[Section]) -> Vec<ClarificationSession> {
    let Some(parent) = find_section_any(sections, CLARIFICATION_TITLES) else {
        return Vec::new();
    };

    let mut result = Vec::new();
    for subsection in get_subsections(parent, sections) {
        let Some(captures) = SESSION_DATE.captures(&subsection.title) else {
            continue;
        };
        let date = captures[1].to_string();

        let clarifications: Vec<Clarification> = extract_list_items(&subsection.children)
            .into_iter()
            .filter_map(|item| {
                QA_ITEM.captures(&item.text).map(|captures| Clarification {
                    question: captures[1].trim().to_string(),
                    answer: captures[2].trim().to_string(),
                })
            })
            .collect();

        if !clarifications.is_empty() {
            result.push(ClarificationSession {
                date,
                clarifications,
            });
        }
    }

    // Newest session first.
    result.sort_by(|a, b| b.date.cmp(&a.date));
    result
}

fn parse_edge_cases(sections: &[Section]) -> Vec<EdgeCase> {
    let Some(section) = find_section_any(sections, EDGE_CASE_TITLES) else {
        return Vec::new();
    };

    extract_list_items(&section.children)
        .into_iter()
        .map(|item| match item.text.split_once('?') {
            Some((question, answer)) => EdgeCase {
                question: format!("{}?", question.trim()),
                answer: answer.trim().to_string(),
            },
            None => EdgeCase {
                question: item.text.trim().to_string(),
                answer: String::new(),
            },
        })
        .collect()
}

fn parse_requirements(sections: &[Section]) -> Vec<RequirementGroup> {
    let Some(section) = find_section_any(sections, REQUIREMENT_TITLES) else {
        return Vec::new();
    };

    let mut groups: Vec<RequirementGroup> = Vec::new();

    for node in &section.children {
        match node {
            crate::markdown::ContentNode::Paragraph { text } => {
                if let Some(captures) = CATEGORY_HEADER.captures(text.trim()) {
                    groups.push(RequirementGroup {
                        category: Some(captures[1].trim().to_string()),
                        requirements: Vec::new(),
                    });
                }
            }
            crate::markdown::ContentNode::List(list) => {
                for item in &list.items {
                    let Some(captures) = REQUIREMENT_ITEM.captures(&item.text) else {
                        continue;
                    };
                    let requirement = Requirement {
                        id: captures[1].to_string(),
                        text: captures[2].trim().to_string(),
                    };
                    match groups.last_mut() {
                        Some(group) => group.requirements.push(requirement),
                        None => groups.push(RequirementGroup {
                            category: None,
                            requirements: vec![requirement],
                        }),
                    }
                }
            }
            _ => {}
        }
    }

    groups.retain(|group| !group.requirements.is_empty());
    groups
}

fn parse_key_entities(sections: &[Section]) -> Vec<KeyEntity> {
    let Some(section) = find_section_any(sections, ENTITY_TITLES) else {
        return Vec::new();
    };

    extract_list_items(&section.children)
        .into_iter()
        .filter_map(|item| {
            let captures = ENTITY_ITEM.captures(&item.text)?;
            Some(KeyEntity {
                name: captures[1].trim().to_string(),
                description: captures[2].trim().to_string(),
                properties: item.children.into_iter().map(|child| child.text).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_heading_variants() {
        let md = "### User Story 1 - View Content (Priority: P1)\n\nBody.\n\n### User Story 2 – Edit Content (Priority: P2)\n\nBody.\n";
        let spec = parse_spec(md);
        assert_eq!(spec.user_stories.len(), 2);
        assert_eq!(spec.user_stories[0].id, "US1");
        assert_eq!(spec.user_stories[0].title, "View Content");
        assert_eq!(spec.user_stories[1].title, "Edit Content");
        assert_eq!(spec.user_stories[1].priority, "P2");
    }

    #[test]
    fn clarification_sessions_sort_newest_first() {
        let md = "## Clarifications\n\n### Session 2025-12-22\n\n- Q: First? → A: One.\n\n### Session 2025-12-23\n\n- Q: Second? -> A: Two.\n";
        let spec = parse_spec(md);
        assert_eq!(spec.clarifications.len(), 2);
        assert_eq!(spec.clarifications[0].date, "2025-12-23");
        assert_eq!(spec.clarifications[0].clarifications[0].answer, "Two.");
        assert_eq!(spec.clarifications[1].date, "2025-12-22");
    }

    #[test]
    fn requirements_group_under_bold_categories() {
        let md = "## Requirements\n\n**Task Management**\n\n- **FR-001**: Allow creating tasks\n- **FR-002**: Allow deleting tasks\n- not a requirement\n\n**Persistence**\n\n- **FR-003**: Store tasks locally\n";
        let spec = parse_spec(md);
        assert_eq!(spec.requirements.len(), 2);
        assert_eq!(
            spec.requirements[0].category.as_deref(),
            Some("Task Management")
        );
        assert_eq!(spec.requirements[0].requirements.len(), 2);
        assert_eq!(spec.requirements[1].requirements[0].id, "FR-003");
    }

    #[test]
    fn key_entities_with_properties() {
        let md = "## Key Entities\n\n- **Task**: A unit of work\n  - id\n  - title\n- **Board**: Holds tasks\n";
        let spec = parse_spec(md);
        assert_eq!(spec.key_entities.len(), 2);
        assert_eq!(spec.key_entities[0].name, "Task");
        assert_eq!(spec.key_entities[0].description, "A unit of work");
        assert_eq!(spec.key_entities[0].properties, vec!["id", "title"]);
    }

    #[test]
    fn unmodeled_sections_are_preserved() {
        let md = "## Success Criteria\n\n- **SC-001**: Fast\n";
        let spec = parse_spec(md);
        assert_eq!(spec.other_sections.len(), 1);
        assert_eq!(spec.other_sections[0].title, "Success Criteria");
        assert!(spec.other_sections[0].content.contains("SC-001"));
    }

    #[test]
    fn empty_input_parses_to_empty_record() {
        let spec = parse_spec("");
        assert!(spec.user_stories.is_empty());
        assert!(spec.clarifications.is_empty());
        assert!(spec.other_sections.is_empty());
        assert_eq!(spec.metadata.branch, None);
    }
}
