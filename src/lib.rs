//! # specdoc
//!
//! Structured parsers for spec-kit planning documents.
//!
//! A feature directory holds a family of loosely-formatted markdown
//! artifacts: the feature specification, technical plan, task list, data
//! model, quickstart guide, research notes, API/component contracts, the
//! project constitution, and quality checklists. None of them have a schema;
//! headings vary in wording, optional sections come and go, metadata rides in
//! bold-labeled lines, and the task list speaks its own checkbox dialect.
//! This crate turns each of them into a typed, immutable record that viewers
//! and editors can render, diff, and point-edit safely.
//!
//! Layout:
//!
//! - [`markdown`] is the generic content tree: section segmentation,
//!   subsection lookup, node projections, header metadata. No knowledge of
//!   any document type.
//! - [`artifacts`] holds one grammar per document type, composing the tree
//!   utilities with a vocabulary of accepted section titles.
//! - [`tasks`] is the line-oriented task-list grammar, kept off the tree
//!   because checkbox lines must keep their exact source positions.
//! - [`checklist`] is the checklist line model and the optimistic single-line
//!   toggle, the only operation here with an error contract.
//!
//! Everything is a pure function of the input string: no I/O, no shared
//! state, nothing to configure. Parsing never fails: missing structure
//! degrades to empty fields, and malformed lines are skipped. Edits happen
//! to the raw text outside this crate; callers re-parse afterwards.

#![allow(rustdoc::invalid_html_tags)]

pub mod artifacts;
pub mod checklist;
pub mod markdown;
pub mod tasks;

pub use artifacts::{parse_artifact, ArtifactKind, ParsedArtifact};
