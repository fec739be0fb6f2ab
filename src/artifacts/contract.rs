//! Grammar for API/component contract documents (contracts/*.md)
//!
//! Contracts have no fixed body structure, so the record is an index:
//! header metadata, the H2 outline with slugged anchors, and every fenced
//! code block. The contract's category is inferred from which metadata keys
//! are present rather than declared anywhere.
//!
//! Metadata scraping is restricted to the pre-first-`##` region: contract
//! bodies routinely document the `**Key**: value` convention itself, and
//! those examples must not be read as metadata.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::markdown::header_region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractKind {
    Api,
    Component,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContractMetadata {
    pub feature: Option<String>,
    pub date: Option<String>,
    pub contract_type: Option<String>,
    pub endpoint: Option<String>,
    pub base_path: Option<String>,
    pub location: Option<String>,
}

/// One H2 heading, addressable by slug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractSection {
    pub id: String,
    pub title: String,
    pub level: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractCodeBlock {
    pub language: String,
    pub code: String,
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedContract {
    pub raw_content: String,
    pub title: Option<String>,
    pub kind: ContractKind,
    pub metadata: ContractMetadata,
    pub sections: Vec<ContractSection>,
    pub code_blocks: Vec<ContractCodeBlock>,
}

static FENCED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(\w*)\n([\s\S]*?)```").expect("fence pattern"));

static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(##)\s+(.+?)\s*$").expect("h2 pattern"));

static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#\s+(.+?)\s*$").expect("h1 pattern"));

/// Parse one contract document. Total for any input.
pub fn parse_contract(text: &str) -> ParsedContract {
    let metadata = parse_metadata(text);
    ParsedContract {
        raw_content: text.to_string(),
        title: H1
            .captures(text)
            .map(|captures| captures[1].trim().to_string()),
        kind: infer_kind(&metadata),
        metadata,
        sections: parse_section_index(text),
        code_blocks: parse_code_blocks(text),
    }
}

fn parse_metadata(text: &str) -> ContractMetadata {
    let header = header_region(text);

    // Values stop at backticks and arrows, which indicate documentation
    // examples rather than real values; Location alone is a backticked path.
    let field = |pattern: &str| -> Option<String> {
        Regex::new(pattern)
            .ok()
            .and_then(|regex| regex.captures(&header))
            .map(|captures| captures[1].trim().to_string())
            .filter(|value| !value.is_empty())
    };

    ContractMetadata {
        feature: field(r"(?i)\*\*Feature\*\*:\s*([^`\n→]+)"),
        date: field(r"(?i)\*\*Date\*\*:\s*([^`\n→]+)"),
        contract_type: field(r"(?i)\*\*Type\*\*:\s*([^`\n→]+)"),
        endpoint: field(r"(?i)\*\*Endpoint\*\*:\s*([^`\n→]+)"),
        base_path: field(r"(?i)\*\*Base Path\*\*:\s*([^`\n→]+)"),
        location: field(r"(?i)\*\*Location\*\*:\s*(`[^`]+`)"),
    }
}

/// endpoint/basePath mark an API contract, a location (or a "component"
/// type) marks a component contract; anything else is unknown.
fn infer_kind(metadata: &ContractMetadata) -> ContractKind {
    if metadata.endpoint.is_some() || metadata.base_path.is_some() {
        return ContractKind::Api;
    }
    if metadata.location.is_some() {
        return ContractKind::Component;
    }
    if let Some(contract_type) = &metadata.contract_type {
        if contract_type.to_lowercase().contains("component") {
            return ContractKind::Component;
        }
    }
    ContractKind::Unknown
}

fn slugify(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    let mut slug = String::new();
    let mut last_dash = false;
    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            if !last_dash && !slug.is_empty() {
                slug.push('-');
                last_dash = true;
            }
        } else {
            slug.push(c);
            last_dash = false;
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn parse_section_index(text: &str) -> Vec<ContractSection> {
    // Fenced code is removed first so `##` lines inside examples are not
    // picked up as sections.
    let without_code = FENCED.replace_all(text, "");

    H2.captures_iter(&without_code)
        .map(|captures| {
            let title = captures[2].trim().to_string();
            ContractSection {
                id: slugify(&title),
                title,
                level: captures[1].len(),
            }
        })
        .collect()
}

fn parse_code_blocks(text: &str) -> Vec<ContractCodeBlock> {
    FENCED
        .captures_iter(text)
        .map(|captures| {
            let language = if captures[1].is_empty() {
                "text".to_string()
            } else {
                captures[1].to_string()
            };
            let code = captures[2].to_string();
            ContractCodeBlock {
                language,
                line_count: code.split('\n').count(),
                code,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_metadata_makes_an_api_contract() {
        let text = "# Tasks API\n\n**Feature**: Board\n**Endpoint**: /api/tasks\n\n## Request\n\n```json\n{}\n```\n";
        let contract = parse_contract(text);
        assert_eq!(contract.kind, ContractKind::Api);
        assert_eq!(contract.title.as_deref(), Some("Tasks API"));
        assert_eq!(contract.metadata.endpoint.as_deref(), Some("/api/tasks"));
    }

    #[test]
    fn location_metadata_makes_a_component_contract() {
        let text = "# Board Panel\n\n**Location**: `src/components/board.tsx`\n";
        let contract = parse_contract(text);
        assert_eq!(contract.kind, ContractKind::Component);
        assert_eq!(
            contract.metadata.location.as_deref(),
            Some("`src/components/board.tsx`")
        );
    }

    #[test]
    fn documentation_of_the_pattern_is_not_metadata() {
        let text = "# Doc\n\n## Conventions\n\nMetadata uses **Endpoint**: /api/example lines.\n";
        let contract = parse_contract(text);
        assert_eq!(contract.metadata.endpoint, None);
        assert_eq!(contract.kind, ContractKind::Unknown);
    }

    #[test]
    fn section_index_skips_fenced_headings() {
        let text = "# C\n\n## Real Section\n\n```md\n## Fake Section\n```\n\n## Another One\n";
        let contract = parse_contract(text);
        let ids: Vec<&str> = contract.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["real-section", "another-one"]);
    }

    #[test]
    fn code_blocks_count_lines() {
        let text = "```ts\nconst a = 1\nconst b = 2\n```\n";
        let contract = parse_contract(text);
        assert_eq!(contract.code_blocks.len(), 1);
        assert_eq!(contract.code_blocks[0].language, "ts");
        assert_eq!(contract.code_blocks[0].line_count, 3);
    }
}
