//! Per-document grammars
//!
//! One grammar per artifact kind, each a pure total function from raw text to
//! a typed record. Grammars compose the generic utilities in
//! [`crate::markdown`] with a fixed vocabulary of accepted section titles;
//! anything under an unrecognized `##` heading lands in the record's
//! `other_sections` catch-all instead of being dropped.

pub mod constitution;
pub mod contract;
pub mod data_model;
pub mod plan;
pub mod quickstart;
pub mod research;
pub mod spec;

use serde::Serialize;

use crate::checklist::{parse_checklist, ParsedChecklist};
use crate::markdown::{render_blocks, Section};
use crate::tasks::{parse_tasks, ParsedTasks};

pub use constitution::{parse_constitution, Constitution};
pub use contract::{parse_contract, ContractKind, ParsedContract};
pub use data_model::{parse_data_model, ParsedDataModel};
pub use plan::{parse_plan, ParsedPlan};
pub use quickstart::{parse_quickstart, ParsedQuickstart};
pub use research::{parse_research, ParsedResearch};
pub use spec::{parse_spec, ParsedSpec, UserStory};

/// A recognized-but-unmodeled section, preserved verbatim-ish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtherSection {
    pub title: String,
    pub content: String,
}

/// Collect every depth-2 section whose title matches none of the grammar's
/// known vocabulary. Guarantees no information is silently dropped.
pub(crate) fn collect_other_sections(sections: &[Section], known: &[&str]) -> Vec<OtherSection> {
    sections
        .iter()
        .filter(|section| section.depth == 2)
        .filter(|section| {
            let title = section.title.to_lowercase();
            !known.iter().any(|needle| title.contains(needle))
        })
        .map(|section| OtherSection {
            title: section.title.clone(),
            content: render_blocks(&section.children),
        })
        .collect()
}

/// The artifact family a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Spec,
    Plan,
    Tasks,
    DataModel,
    Quickstart,
    Research,
    Contract,
    Constitution,
    Checklist,
}

impl ArtifactKind {
    pub const ALL: &'static [ArtifactKind] = &[
        ArtifactKind::Spec,
        ArtifactKind::Plan,
        ArtifactKind::Tasks,
        ArtifactKind::DataModel,
        ArtifactKind::Quickstart,
        ArtifactKind::Research,
        ArtifactKind::Contract,
        ArtifactKind::Constitution,
        ArtifactKind::Checklist,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::Spec => "spec",
            ArtifactKind::Plan => "plan",
            ArtifactKind::Tasks => "tasks",
            ArtifactKind::DataModel => "data-model",
            ArtifactKind::Quickstart => "quickstart",
            ArtifactKind::Research => "research",
            ArtifactKind::Contract => "contract",
            ArtifactKind::Constitution => "constitution",
            ArtifactKind::Checklist => "checklist",
        }
    }

    pub fn from_name(name: &str) -> Option<ArtifactKind> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name.trim().to_lowercase())
    }

    /// Infer the kind from a file path, the way features lay their
    /// artifacts out on disk (`spec.md`, `contracts/*.md`, `checklists/*.md`).
    pub fn from_path(path: &str) -> Option<ArtifactKind> {
        let normalized = path.replace('\\', "/");
        let file_name = normalized.rsplit('/').next().unwrap_or(&normalized);
        match file_name {
            "spec.md" => return Some(ArtifactKind::Spec),
            "plan.md" => return Some(ArtifactKind::Plan),
            "tasks.md" => return Some(ArtifactKind::Tasks),
            "data-model.md" => return Some(ArtifactKind::DataModel),
            "quickstart.md" => return Some(ArtifactKind::Quickstart),
            "research.md" => return Some(ArtifactKind::Research),
            "constitution.md" => return Some(ArtifactKind::Constitution),
            _ => {}
        }
        if normalized.contains("/contracts/") && file_name.ends_with(".md") {
            return Some(ArtifactKind::Contract);
        }
        if normalized.contains("/checklists/") && file_name.ends_with(".md") {
            return Some(ArtifactKind::Checklist);
        }
        None
    }
}

/// One parsed document of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "document", rename_all = "kebab-case")]
pub enum ParsedArtifact {
    Spec(ParsedSpec),
    Plan(ParsedPlan),
    Tasks(ParsedTasks),
    DataModel(ParsedDataModel),
    Quickstart(ParsedQuickstart),
    Research(ParsedResearch),
    Contract(ParsedContract),
    Constitution(Constitution),
    Checklist(ParsedChecklist),
}

/// Parse one document with the grammar for its kind. Total for any input.
pub fn parse_artifact(kind: ArtifactKind, text: &str) -> ParsedArtifact {
    match kind {
        ArtifactKind::Spec => ParsedArtifact::Spec(parse_spec(text)),
        ArtifactKind::Plan => ParsedArtifact::Plan(parse_plan(text)),
        ArtifactKind::Tasks => ParsedArtifact::Tasks(parse_tasks(text)),
        ArtifactKind::DataModel => ParsedArtifact::DataModel(parse_data_model(text)),
        ArtifactKind::Quickstart => ParsedArtifact::Quickstart(parse_quickstart(text)),
        ArtifactKind::Research => ParsedArtifact::Research(parse_research(text)),
        ArtifactKind::Contract => ParsedArtifact::Contract(parse_contract(text)),
        ArtifactKind::Constitution => ParsedArtifact::Constitution(parse_constitution(text)),
        ArtifactKind::Checklist => ParsedArtifact::Checklist(parse_checklist(text)),
    }
}
