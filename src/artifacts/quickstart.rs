//! Grammar for the quickstart guide (quickstart.md)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{collect_other_sections, OtherSection};
use crate::markdown::{
    extract_code_blocks, extract_intro_text, extract_list_items, extract_metadata_value,
    extract_simple_list, extract_text, find_section_any, get_subsections, parse_sections,
    CodeBlock, ContentNode, Section,
};

/// One `### N. Title` setup step and its command blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupStep {
    pub id: u32,
    pub title: String,
    pub commands: Vec<CodeBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentSubsection {
    pub title: String,
    pub content: String,
    pub code_blocks: Vec<CodeBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentSection {
    pub intro: Option<String>,
    pub subsections: Vec<DevelopmentSubsection>,
    pub code_blocks: Vec<CodeBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandEntry {
    pub title: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectScripts {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationItem {
    pub text: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationChecklist {
    pub intro: Option<String>,
    pub items: Vec<VerificationItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyFiles {
    pub intro: Option<String>,
    pub files: Vec<String>,
}

/// A prose intro followed by its bullet list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowserSupportGroup {
    pub intro: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedQuickstart {
    pub raw_content: String,
    pub feature: Option<String>,
    pub date: Option<String>,
    pub prerequisites: Vec<String>,
    pub setup_steps: Vec<SetupStep>,
    pub development: Option<DevelopmentSection>,
    pub development_commands: Vec<CommandEntry>,
    pub project_scripts: Option<ProjectScripts>,
    pub verification: VerificationChecklist,
    pub key_files: KeyFiles,
    pub browser_support: Vec<BrowserSupportGroup>,
    pub other_sections: Vec<OtherSection>,
}

const KNOWN_SECTIONS: &[&str] = &[
    "prerequisites",
    "setup",
    "verification",
    "key files",
    "browser support",
    "development commands",
    "development",
    "project scripts",
];

static NUMBERED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\.\s*(.+)$").expect("numbered title pattern"));

static BACKTICKED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("backtick pattern"));

static LEADING_CHECKBOX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[ xX]\]\s*").expect("leading checkbox pattern"));

/// Parse quickstart.md. Total for any input.
pub fn parse_quickstart(text: &str) -> ParsedQuickstart {
    let sections = parse_sections(text);

    ParsedQuickstart {
        raw_content: text.to_string(),
        feature: extract_metadata_value(text, "Feature"),
        date: extract_metadata_value(text, "Date"),
        prerequisites: parse_prerequisites(&sections),
        setup_steps: parse_setup_steps(&sections),
        development: parse_development(&sections),
        development_commands: parse_development_commands(&sections),
        project_scripts: parse_project_scripts(&sections),
        verification: parse_verification(&sections),
        key_files: parse_key_files(&sections),
        browser_support: parse_browser_support(&sections),
        other_sections: collect_other_sections(&sections, KNOWN_SECTIONS),
    }
}

fn parse_prerequisites(sections: &[Section]) -> Vec<String> {
    match find_section_any(sections, &["prerequisites"]) {
        Some(section) => extract_simple_list(&section.children),
        None => Vec::new(),
    }
}

fn parse_setup_steps(sections: &[Section]) -> Vec<SetupStep> {
    let Some(section) = find_section_any(sections, &["setup"]) else {
        return Vec::new();
    };

    get_subsections(section, sections)
        .into_iter()
        .filter_map(|subsection| {
            let captures = NUMBERED_TITLE.captures(&subsection.title)?;
            let id = captures[1].parse::<u32>().ok()?;
            Some(SetupStep {
                id,
                title: captures[2].trim().to_string(),
                commands: extract_code_blocks(&subsection.children),
            })
        })
        .collect()
}

/// "Development" but not "Development Commands".
fn parse_development(sections: &[Section]) -> Option<DevelopmentSection> {
    let section = sections.iter().find(|section| {
        let title = section.title.to_lowercase();
        title == "development" || (title.contains("development") && !title.contains("commands"))
    })?;

    let subsections = get_subsections(section, sections)
        .into_iter()
        .map(|subsection| DevelopmentSubsection {
            title: subsection.title.clone(),
            content: extract_text(&subsection.children),
            code_blocks: extract_code_blocks(&subsection.children),
        })
        .collect();

    Some(DevelopmentSection {
        intro: extract_intro_text(&section.children),
        subsections,
        code_blocks: extract_code_blocks(&section.children),
    })
}

fn parse_development_commands(sections: &[Section]) -> Vec<CommandEntry> {
    let Some(section) = find_section_any(sections, &["development commands"]) else {
        return Vec::new();
    };

    extract_code_blocks(&section.children)
        .into_iter()
        .map(|block| {
            let command = block.code.trim().to_string();
            let title = block
                .language
                .clone()
                .filter(|language| !language.is_empty())
                .or_else(|| command.split_whitespace().next().map(str::to_string))
                .unwrap_or_default();
            CommandEntry { title, command }
        })
        .collect()
}

fn parse_project_scripts(sections: &[Section]) -> Option<ProjectScripts> {
    let section = find_section_any(sections, &["project scripts"])?;

    let code_blocks = extract_code_blocks(&section.children);
    let content = match code_blocks.first() {
        Some(block) => block.code.trim_end().to_string(),
        None => extract_text(&section.children),
    };
    if content.is_empty() {
        return None;
    }

    Some(ProjectScripts {
        title: section.title.clone(),
        content,
    })
}

fn parse_verification(sections: &[Section]) -> VerificationChecklist {
    let Some(section) = find_section_any(sections, &["verification"]) else {
        return VerificationChecklist {
            intro: None,
            items: Vec::new(),
        };
    };

    let items = extract_list_items(&section.children)
        .into_iter()
        .map(|item| {
            // Belt and braces: comrak consumes checkbox syntax for task
            // items, but hand-written lists sometimes survive as plain text.
            let text = LEADING_CHECKBOX.replace(&item.text, "").to_string();
            let checked = item
                .checked
                .unwrap_or_else(|| item.text.starts_with("[x]") || item.text.starts_with("[X]"));
            VerificationItem { text, checked }
        })
        .collect();

    VerificationChecklist {
        intro: extract_intro_text(&section.children),
        items,
    }
}

fn parse_key_files(sections: &[Section]) -> KeyFiles {
    let Some(section) = find_section_any(sections, &["key files"]) else {
        return KeyFiles {
            intro: None,
            files: Vec::new(),
        };
    };

    let files = extract_simple_list(&section.children)
        .into_iter()
        .map(|item| match BACKTICKED.captures(&item) {
            Some(captures) => captures[1].to_string(),
            None => item,
        })
        .collect();

    KeyFiles {
        intro: extract_intro_text(&section.children),
        files,
    }
}

fn parse_browser_support(sections: &[Section]) -> Vec<BrowserSupportGroup> {
    let Some(section) = find_section_any(sections, &["browser support"]) else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    let mut pending_intro: Option<String> = None;

    for node in &section.children {
        match node {
            ContentNode::Paragraph { text } => pending_intro = Some(text.clone()),
            ContentNode::List(_) => {
                if let Some(intro) = pending_intro.take() {
                    groups.push(BrowserSupportGroup {
                        intro,
                        items: extract_simple_list(std::slice::from_ref(node)),
                    });
                }
            }
            _ => {}
        }
    }

    if groups.is_empty() {
        let items = extract_simple_list(&section.children);
        if !items.is_empty() {
            groups.push(BrowserSupportGroup {
                intro: String::new(),
                items,
            });
        }
    }

    groups
}
