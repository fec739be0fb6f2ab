//! Pure projections over a section's block nodes
//!
//! Each projection filters one node kind out of a `ContentNode` slice and
//! returns owned values. Absence is an empty collection or `None`; nothing
//! here can fail.

use super::tree::{CodeBlock, ContentNode, ListItem, TableData};

/// All fenced code blocks, in order.
pub fn extract_code_blocks(nodes: &[ContentNode]) -> Vec<CodeBlock> {
    nodes
        .iter()
        .filter_map(|node| match node {
            ContentNode::CodeBlock(block) => Some(block.clone()),
            _ => None,
        })
        .collect()
}

/// All tables, in order.
pub fn extract_tables(nodes: &[ContentNode]) -> Vec<TableData> {
    nodes
        .iter()
        .filter_map(|node| match node {
            ContentNode::Table(table) => Some(table.clone()),
            _ => None,
        })
        .collect()
}

/// List items from every top-level list, flattened into one sequence.
pub fn extract_list_items(nodes: &[ContentNode]) -> Vec<ListItem> {
    let mut items = Vec::new();
    for node in nodes {
        if let ContentNode::List(list) = node {
            items.extend(list.items.iter().cloned());
        }
    }
    items
}

/// List item texts only, nesting ignored.
pub fn extract_simple_list(nodes: &[ContentNode]) -> Vec<String> {
    extract_list_items(nodes)
        .into_iter()
        .map(|item| item.text)
        .collect()
}

/// Paragraph text only, blank-line separated.
pub fn extract_text(nodes: &[ContentNode]) -> String {
    let paragraphs: Vec<&str> = nodes
        .iter()
        .filter_map(|node| match node {
            ContentNode::Paragraph { text } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    paragraphs.join("\n\n")
}

/// Text content of every node kind, blank-line separated.
pub fn extract_full_text(nodes: &[ContentNode]) -> String {
    let mut parts = Vec::new();
    for node in nodes {
        let text = match node {
            ContentNode::Paragraph { text } => text.clone(),
            ContentNode::Blockquote { text } => text.clone(),
            ContentNode::CodeBlock(block) => block.code.trim_end().to_string(),
            ContentNode::List(list) => list
                .items
                .iter()
                .map(|item| item.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            ContentNode::Table(table) => table
                .rows
                .iter()
                .map(|row| row.join(" "))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        if !text.is_empty() {
            parts.push(text);
        }
    }
    parts.join("\n\n")
}

/// The first blockquote's text, if any.
pub fn extract_blockquote(nodes: &[ContentNode]) -> Option<String> {
    nodes.iter().find_map(|node| match node {
        ContentNode::Blockquote { text } => Some(text.clone()),
        _ => None,
    })
}

/// Paragraph text appearing before the first list, used for section
/// summaries. `None` when the section opens with a list or has no prose.
pub fn extract_intro_text(nodes: &[ContentNode]) -> Option<String> {
    let mut intro = Vec::new();
    for node in nodes {
        match node {
            ContentNode::List(_) => break,
            ContentNode::Paragraph { text } => intro.push(text.as_str()),
            _ => {}
        }
    }
    if intro.is_empty() {
        None
    } else {
        Some(intro.join("\n\n"))
    }
}

/// Reconstruct readable markdown from block nodes.
///
/// Used for the `other_sections` catch-all, where callers get prose back
/// rather than a tree. The output is normalized markdown, not the original
/// bytes; HTML comments are already gone at this point.
pub fn render_blocks(nodes: &[ContentNode]) -> String {
    let mut parts = Vec::new();
    for node in nodes {
        let rendered = match node {
            ContentNode::Paragraph { text } => text.clone(),
            ContentNode::Blockquote { text } => text
                .lines()
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            ContentNode::CodeBlock(block) => {
                let language = block.language.as_deref().unwrap_or("");
                format!("```{language}\n{}\n```", block.code.trim_end())
            }
            ContentNode::List(list) => render_list_items(&list.items, list.ordered, 0),
            ContentNode::Table(table) => render_table(table),
        };
        if !rendered.is_empty() {
            parts.push(rendered);
        }
    }
    parts.join("\n\n")
}

fn render_list_items(items: &[ListItem], ordered: bool, indent: usize) -> String {
    let mut lines = Vec::new();
    let pad = "  ".repeat(indent);
    for (index, item) in items.iter().enumerate() {
        let marker = if ordered {
            format!("{}.", index + 1)
        } else {
            "-".to_string()
        };
        let checkbox = match item.checked {
            Some(true) => "[x] ",
            Some(false) => "[ ] ",
            None => "",
        };
        lines.push(format!("{pad}{marker} {checkbox}{}", item.text));
        if !item.children.is_empty() {
            lines.push(render_list_items(&item.children, false, indent + 1));
        }
    }
    lines.join("\n")
}

fn render_table(table: &TableData) -> String {
    let mut lines = Vec::new();
    if !table.headers.is_empty() {
        lines.push(format!("| {} |", table.headers.join(" | ")));
        lines.push(format!(
            "|{}|",
            table.headers.iter().map(|_| " --- ").collect::<Vec<_>>().join("|")
        ));
    }
    for row in &table.rows {
        lines.push(format!("| {} |", row.join(" | ")));
    }
    lines.join("\n")
}
