//! Grammar for the data model document (data-model.md)
//!
//! Entities and enums are `###` subsections holding one description
//! paragraph and one code block; the behavioral sections are tables and
//! bullet lists keyed by subsection title.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{collect_other_sections, OtherSection};
use crate::markdown::{
    extract_code_blocks, extract_metadata_value, extract_simple_list, extract_tables, extract_text,
    find_section_any, get_subsections, parse_sections, Section,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataEntity {
    pub name: String,
    pub description: Option<String>,
    pub code_block: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataEnum {
    pub name: String,
    pub code_block: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationRule {
    pub field: String,
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTransition {
    pub state: String,
    pub condition: String,
    pub transitions_to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTransitionGroup {
    pub title: String,
    pub description: Option<String>,
    pub code_block: Option<String>,
    pub transitions: Vec<StateTransition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageKey {
    pub key: String,
    pub value_type: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageSchemaGroup {
    pub title: String,
    pub keys: Vec<StorageKey>,
    pub code_block: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageSchema {
    pub groups: Vec<StorageSchemaGroup>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortingBehavior {
    pub option: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteringBehavior {
    pub filter: String,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataIntegrityRule {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedDataModel {
    pub raw_content: String,
    pub feature: Option<String>,
    pub date: Option<String>,
    pub entities: Vec<DataEntity>,
    pub enums: Vec<DataEnum>,
    pub validation_rules: Vec<ValidationRule>,
    pub state_transitions: Vec<StateTransitionGroup>,
    pub storage_schema: StorageSchema,
    pub sorting_behavior: Vec<SortingBehavior>,
    pub filtering_behavior: Vec<FilteringBehavior>,
    pub search_behavior: Vec<String>,
    pub data_integrity: Vec<DataIntegrityRule>,
    pub other_sections: Vec<OtherSection>,
}

const KNOWN_SECTIONS: &[&str] = &[
    "entities",
    "enums",
    "validation rules",
    "state transitions",
    "localstorage schema",
    "storage schema",
    "sorting behavior",
    "filtering behavior",
    "search behavior",
    "data integrity",
];

static NOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Note:\s*([^\n]+)").expect("note pattern"));

static BY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^By\s+").expect("by prefix pattern"));

/// Parse data-model.md. Total for any input.
pub fn parse_data_model(text: &str) -> ParsedDataModel {
    let sections = parse_sections(text);

    ParsedDataModel {
        raw_content: text.to_string(),
        feature: extract_metadata_value(text, "Feature"),
        date: extract_metadata_value(text, "Date"),
        entities: parse_entities(&sections),
        enums: parse_enums(&sections),
        validation_rules: parse_validation_rules(&sections),
        state_transitions: parse_state_transitions(&sections),
        storage_schema: parse_storage_schema(&sections),
        sorting_behavior: parse_sorting_behavior(&sections),
        filtering_behavior: parse_filtering_behavior(&sections),
        search_behavior: parse_search_behavior(&sections),
        data_integrity: parse_data_integrity(&sections),
        other_sections: collect_other_sections(&sections, KNOWN_SECTIONS),
    }
}

fn first_code_block(section: &Section) -> Option<String> {
    extract_code_blocks(&section.children)
        .first()
        .map(|block| block.code.trim_end().to_string())
}

fn optional_text(section: &Section) -> Option<String> {
    let text = extract_text(&section.children);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_entities(sections: &[Section]) -> Vec<DataEntity> {
    let Some(section) = find_section_any(sections, &["entities"]) else {
        return Vec::new();
    };

    get_subsections(section, sections)
        .into_iter()
        .map(|subsection| DataEntity {
            name: subsection.title.clone(),
            description: optional_text(subsection),
            code_block: first_code_block(subsection),
        })
        .collect()
}

fn parse_enums(sections: &[Section]) -> Vec<DataEnum> {
    let Some(section) = find_section_any(sections, &["enums"]) else {
        return Vec::new();
    };

    get_subsections(section, sections)
        .into_iter()
        .map(|subsection| DataEnum {
            name: subsection.title.clone(),
            code_block: first_code_block(subsection),
        })
        .collect()
}

fn parse_validation_rules(sections: &[Section]) -> Vec<ValidationRule> {
    let Some(section) = find_section_any(sections, &["validation rules"]) else {
        return Vec::new();
    };

    get_subsections(section, sections)
        .into_iter()
        .filter_map(|subsection| {
            let rules = extract_simple_list(&subsection.children);
            if rules.is_empty() {
                return None;
            }
            Some(ValidationRule {
                field: subsection.title.clone(),
                rules,
            })
        })
        .collect()
}

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

fn parse_state_transitions(sections: &[Section]) -> Vec<StateTransitionGroup> {
    let Some(section) = find_section_any(sections, &["state transitions"]) else {
        return Vec::new();
    };

    get_subsections(section, sections)
        .into_iter()
        .map(|subsection| {
            let tables = extract_tables(&subsection.children);
            let transitions = tables
                .first()
                .map(|table| {
                    table
                        .rows
                        .iter()
                        .map(|row| StateTransition {
                            state: cell(row, 0),
                            condition: cell(row, 1),
                            transitions_to: cell(row, 2)
                                .split(',')
                                .map(|target| target.trim().to_string())
                                .filter(|target| !target.is_empty())
                                .collect(),
                        })
                        .collect()
                })
                .unwrap_or_default();

            StateTransitionGroup {
                title: subsection.title.clone(),
                description: optional_text(subsection),
                code_block: first_code_block(subsection),
                transitions,
            }
        })
        .collect()
}

fn parse_storage_schema(sections: &[Section]) -> StorageSchema {
    let Some(section) = find_section_any(sections, &["localstorage schema", "storage schema"])
    else {
        return StorageSchema {
            groups: Vec::new(),
            note: None,
        };
    };

    let mut note = None;
    let groups = get_subsections(section, sections)
        .into_iter()
        .map(|subsection| {
            let tables = extract_tables(&subsection.children);
            let keys = tables
                .first()
                .map(|table| {
                    table
                        .rows
                        .iter()
                        .map(|row| StorageKey {
                            key: cell(row, 0).replace('`', ""),
                            value_type: cell(row, 1).replace('`', ""),
                            description: cell(row, 2),
                        })
                        .collect()
                })
                .unwrap_or_default();

            if note.is_none() {
                if let Some(captures) = NOTE.captures(&extract_text(&subsection.children)) {
                    note = Some(captures[1].trim().to_string());
                }
            }

            StorageSchemaGroup {
                title: subsection.title.clone(),
                keys,
                code_block: first_code_block(subsection),
            }
        })
        .collect();

    if note.is_none() {
        if let Some(captures) = NOTE.captures(&extract_text(&section.children)) {
            note = Some(captures[1].trim().to_string());
        }
    }

    StorageSchema { groups, note }
}

fn parse_sorting_behavior(sections: &[Section]) -> Vec<SortingBehavior> {
    let Some(section) = find_section_any(sections, &["sorting behavior"]) else {
        return Vec::new();
    };

    get_subsections(section, sections)
        .into_iter()
        .map(|subsection| SortingBehavior {
            // "By Date" reads as the option "Date".
            option: BY_PREFIX.replace(&subsection.title, "").to_string(),
            description: extract_text(&subsection.children),
        })
        .collect()
}

fn parse_filtering_behavior(sections: &[Section]) -> Vec<FilteringBehavior> {
    let Some(section) = find_section_any(sections, &["filtering behavior"]) else {
        return Vec::new();
    };

    let tables = extract_tables(&section.children);
    let Some(table) = tables.first() else {
        return Vec::new();
    };
    table
        .rows
        .iter()
        .map(|row| FilteringBehavior {
            filter: cell(row, 0),
            condition: cell(row, 1),
        })
        .collect()
}

fn parse_search_behavior(sections: &[Section]) -> Vec<String> {
    match find_section_any(sections, &["search behavior"]) {
        Some(section) => extract_simple_list(&section.children),
        None => Vec::new(),
    }
}

fn parse_data_integrity(sections: &[Section]) -> Vec<DataIntegrityRule> {
    let Some(section) = find_section_any(sections, &["data integrity"]) else {
        return Vec::new();
    };

    get_subsections(section, sections)
        .into_iter()
        .map(|subsection| DataIntegrityRule {
            title: subsection.title.clone(),
            items: extract_simple_list(&subsection.children),
        })
        .collect()
}
