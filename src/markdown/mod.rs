//! Generic content-tree utilities for planning documents
//!
//! Everything here is document-type agnostic: parsing Markdown into a flat
//! block tree, segmenting it into sections by heading, looking sections up by
//! fuzzy title, projecting one node kind out of a section, and reading
//! bold-label metadata from the header region. The per-document grammars in
//! [`crate::artifacts`] compose these primitives with their own vocabulary.
//!
//! Failure policy: every function is total. Absence yields an empty
//! collection or `None`; malformed input degrades, it never errors.

pub mod metadata;
pub mod projections;
pub mod sections;
pub mod tree;

pub use metadata::{extract_metadata, extract_metadata_value, header_region};
pub use projections::{
    extract_blockquote, extract_code_blocks, extract_full_text, extract_intro_text,
    extract_list_items, extract_simple_list, extract_tables, extract_text, render_blocks,
};
pub use sections::{find_section, find_section_any, find_sections, get_subsections};
pub use tree::{
    parse_blocks, parse_sections, CodeBlock, ContentNode, ListBlock, ListItem, Section, TableData,
};
