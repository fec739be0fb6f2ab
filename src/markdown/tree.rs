//! Content tree for planning documents (Markdown → block nodes)
//!
//! Converts CommonMark Markdown to a flat, owned block tree.
//! Pipeline: Markdown string → Comrak AST → `ContentNode` blocks / `Section` runs
//!
//! The tree is deliberately shallow: headings are not containers. A document
//! is a flat ordered list of sections, each holding the blocks up to the next
//! heading of equal or shallower depth. Nesting is reconstructed on demand by
//! depth comparison (see [`super::sections`]), because callers need both the
//! "all sections" and "subsections of X" views of the same document.
//!
//! Inline content is flattened to text that keeps the author's markers:
//! strong as `**…**`, emphasis as `*…*`, inline code as backticks, links as
//! their text. Downstream grammars match the same patterns the document
//! authors wrote. HTML blocks (comments included) have no block
//! representation, which is how comment stripping happens for every grammar.

use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use serde::Serialize;

/// A heading plus the blocks that follow it, up to the next heading.
///
/// `depth` is the heading level (`##` → 2). Content appearing before the
/// first heading of a document is returned as a synthetic section with
/// depth 0 and an empty title, so leading metadata is never lost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub depth: usize,
    pub children: Vec<ContentNode>,
}

/// One block of section content, in authored order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContentNode {
    Paragraph { text: String },
    List(ListBlock),
    Table(TableData),
    CodeBlock(CodeBlock),
    Blockquote { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListBlock {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// A list item. `checked` is `Some` only for task-list items (`- [ ]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub text: String,
    pub checked: Option<bool>,
    pub children: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub code: String,
}

fn comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

/// Parse a document into its block nodes, ignoring headings.
pub fn parse_blocks(text: &str) -> Vec<ContentNode> {
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, text, &options);

    let mut blocks = Vec::new();
    for child in root.children() {
        if let Some(block) = convert_block(child) {
            blocks.push(block);
        }
    }
    blocks
}

/// Parse a document into its flat section list.
///
/// Every heading starts a new section; all following non-heading blocks
/// belong to it. Blocks before the first heading form the synthetic depth-0
/// header section. Never fails: malformed input yields fewer (or zero)
/// sections, not an error.
pub fn parse_sections(text: &str) -> Vec<Section> {
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, text, &options);

    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;

    for node in root.children() {
        let heading_depth = {
            let node_data = node.data.borrow();
            match &node_data.value {
                NodeValue::Heading(heading) => Some(heading.level as usize),
                _ => None,
            }
        };
        if let Some(depth) = heading_depth {
            let title = inline_text(node);
            // A heading with no text is malformed; ignore it and let content
            // keep accruing to the current section.
            if title.trim().is_empty() {
                continue;
            }
            if let Some(section) = current.take() {
                sections.push(section);
            }
            current = Some(Section {
                title,
                depth,
                children: Vec::new(),
            });
        } else if let Some(block) = convert_block(node) {
            match current.as_mut() {
                Some(section) => section.children.push(block),
                None => {
                    current = Some(Section {
                        title: String::new(),
                        depth: 0,
                        children: vec![block],
                    });
                }
            }
        }
    }

    if let Some(section) = current.take() {
        sections.push(section);
    }
    sections
}

/// Convert a Comrak block node to an owned `ContentNode`.
///
/// Thematic breaks, HTML blocks, and anything without a block equivalent
/// return `None` and are dropped from the tree.
fn convert_block<'a>(node: &'a AstNode<'a>) -> Option<ContentNode> {
    let node_data = node.data.borrow();
    match &node_data.value {
        NodeValue::Paragraph => Some(ContentNode::Paragraph {
            text: inline_text(node),
        }),

        NodeValue::List(list) => {
            let ordered = matches!(list.list_type, ListType::Ordered);
            let items = node.children().map(convert_list_item).collect();
            Some(ContentNode::List(ListBlock { ordered, items }))
        }

        NodeValue::CodeBlock(code_block) => {
            let language = if code_block.info.is_empty() {
                None
            } else {
                Some(code_block.info.clone())
            };
            Some(ContentNode::CodeBlock(CodeBlock {
                language,
                code: code_block.literal.clone(),
            }))
        }

        NodeValue::Table(_) => Some(ContentNode::Table(convert_table(node))),

        NodeValue::BlockQuote => {
            let mut parts = Vec::new();
            for child in node.children() {
                let text = inline_text(child);
                if !text.is_empty() {
                    parts.push(text);
                }
            }
            Some(ContentNode::Blockquote {
                text: parts.join("\n"),
            })
        }

        _ => None,
    }
}

fn convert_list_item<'a>(item: &'a AstNode<'a>) -> ListItem {
    let checked = match &item.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
        _ => None,
    };

    let mut texts = Vec::new();
    let mut children = Vec::new();
    for child in item.children() {
        match &child.data.borrow().value {
            NodeValue::List(_) => {
                children.extend(child.children().map(convert_list_item));
            }
            _ => {
                let text = inline_text(child);
                if !text.is_empty() {
                    texts.push(text);
                }
            }
        }
    }

    ListItem {
        text: texts.join("\n"),
        checked,
        children,
    }
}

fn convert_table<'a>(table: &'a AstNode<'a>) -> TableData {
    let mut headers = Vec::new();
    let mut rows = Vec::new();

    for row in table.children() {
        let is_header = matches!(row.data.borrow().value, NodeValue::TableRow(true));
        let cells: Vec<String> = row.children().map(inline_text).collect();
        if is_header && headers.is_empty() {
            headers = cells;
        } else {
            rows.push(cells);
        }
    }

    TableData { headers, rows }
}

/// Flatten the inline children of a block node into marker-preserving text.
pub(crate) fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for child in node.children() {
        collect_inline(child, &mut out);
    }
    out
}

fn collect_inline<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => out.push_str(text),

        NodeValue::Code(code) => {
            out.push('`');
            out.push_str(&code.literal);
            out.push('`');
        }

        NodeValue::Strong => {
            out.push_str("**");
            for child in node.children() {
                collect_inline(child, out);
            }
            out.push_str("**");
        }

        NodeValue::Emph => {
            out.push('*');
            for child in node.children() {
                collect_inline(child, out);
            }
            out.push('*');
        }

        // Soft breaks keep their newline so line-oriented patterns
        // (metadata key/value runs) still see one entry per line.
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push('\n'),

        // Links and everything else contribute their text content only.
        _ => {
            for child in node.children() {
                collect_inline(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_sections_by_heading() {
        let md = "# Title\n\nIntro.\n\n## First\n\nBody.\n";
        let sections = parse_sections(md);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Title");
        assert_eq!(sections[0].depth, 1);
        assert_eq!(sections[1].title, "First");
        assert_eq!(sections[1].depth, 2);
    }

    #[test]
    fn leading_content_becomes_header_section() {
        let md = "**Feature**: Sample\n\n## Overview\n\nText.\n";
        let sections = parse_sections(md);

        assert_eq!(sections[0].depth, 0);
        assert_eq!(sections[0].title, "");
        assert_eq!(
            sections[0].children,
            vec![ContentNode::Paragraph {
                text: "**Feature**: Sample".to_string()
            }]
        );
    }

    #[test]
    fn inline_markers_survive_flattening() {
        let blocks = parse_blocks("**Branch**: `main` and *emphasis*\n");
        assert_eq!(
            blocks,
            vec![ContentNode::Paragraph {
                text: "**Branch**: `main` and *emphasis*".to_string()
            }]
        );
    }

    #[test]
    fn task_list_items_carry_checked_state() {
        let blocks = parse_blocks("- [x] done\n- [ ] pending\n- plain\n");
        let ContentNode::List(list) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].checked, Some(true));
        assert_eq!(list.items[1].checked, Some(false));
        assert_eq!(list.items[2].checked, None);
    }

    #[test]
    fn tables_split_headers_and_rows() {
        let md = "| A | B |\n|---|---|\n| 1 | 2 |\n";
        let blocks = parse_blocks(md);
        let ContentNode::Table(table) = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn html_comments_are_dropped() {
        let blocks = parse_blocks("<!-- hidden -->\n\nVisible.\n");
        assert_eq!(
            blocks,
            vec![ContentNode::Paragraph {
                text: "Visible.".to_string()
            }]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_sections("").is_empty());
        assert!(parse_blocks("").is_empty());
    }

    #[test]
    fn textless_headings_are_ignored() {
        let sections = parse_sections("## Real\n\nBefore.\n\n##\n\nAfter.\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Real");
        assert_eq!(sections[0].children.len(), 2);
    }
}
