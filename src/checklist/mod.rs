//! Checklist line model and single-line toggle engine
//!
//! Checklists are flat checkbox files. Parsing keeps each item's 0-based
//! source line so the rendering layer can point back at exactly one line when
//! the user toggles it.
//!
//! [`toggle_line`] is the one operation in this crate with an error contract.
//! The caller supplies the checkbox state it last observed; the toggle only
//! applies when that state still matches the supplied content, otherwise it
//! reports [`ToggleError::Conflict`] so the caller can refetch and re-render
//! instead of silently overwriting a concurrent edit. Retry and debounce
//! policy belong to the caller, not here.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static CHECKBOX_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*[-*]\s*\[)([ xX])(\])\s*(.*)$").expect("checkbox pattern"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistItem {
    pub text: String,
    pub checked: bool,
    /// 0-based source line, the handle for toggling.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistProgress {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedChecklist {
    pub raw_content: String,
    pub items: Vec<ChecklistItem>,
    pub progress: ChecklistProgress,
}

/// True when the line is a `-`/`*` checkbox line (any indentation).
pub fn is_checkbox_line(line: &str) -> bool {
    CHECKBOX_LINE.is_match(line)
}

/// The checkbox state of one line, `None` when it has no checkbox.
pub fn checkbox_state(line: &str) -> Option<bool> {
    CHECKBOX_LINE
        .captures(line)
        .map(|captures| !captures[2].eq(" "))
}

/// Count checked and total checkbox lines.
pub fn checklist_progress(text: &str) -> ChecklistProgress {
    let mut completed = 0;
    let mut total = 0;
    for line in text.lines() {
        if let Some(checked) = checkbox_state(line) {
            total += 1;
            if checked {
                completed += 1;
            }
        }
    }
    ChecklistProgress { completed, total }
}

/// Parse a checklist document into its line-addressed items.
pub fn parse_checklist(text: &str) -> ParsedChecklist {
    let mut items = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(captures) = CHECKBOX_LINE.captures(line) {
            items.push(ChecklistItem {
                text: captures[4].trim().to_string(),
                checked: !captures[2].eq(" "),
                line: index,
            });
        }
    }
    let progress = ChecklistProgress {
        completed: items.iter().filter(|item| item.checked).count(),
        total: items.len(),
    };
    ParsedChecklist {
        raw_content: text.to_string(),
        items,
        progress,
    }
}

/// Successful toggle: the rewritten content and the state the line now has.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggled {
    pub content: String,
    pub new_state: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleError {
    /// The line index does not exist in the supplied content.
    LineOutOfBounds { line: usize, lines: usize },
    /// The line exists but carries no checkbox.
    NotACheckbox { line: usize },
    /// The checkbox no longer has the state the caller observed.
    Conflict { expected: bool, actual: bool },
}

impl fmt::Display for ToggleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleError::LineOutOfBounds { line, lines } => {
                write!(f, "Line index {} is out of bounds ({} lines)", line, lines)
            }
            ToggleError::NotACheckbox { line } => {
                write!(f, "Line {} is not a valid checkbox line", line)
            }
            ToggleError::Conflict { .. } => {
                write!(f, "Content has been modified; refresh and try again")
            }
        }
    }
}

impl std::error::Error for ToggleError {}

/// Flip the checkbox at `line_index`, guarded by the caller's observed state.
///
/// On success exactly one `[ ]`/`[x]` token changes; every other byte of the
/// content, including the toggled line's text and the trailing newline, is
/// preserved. A state mismatch is a [`ToggleError::Conflict`] and leaves the
/// content untouched; it is never merged or retried here.
pub fn toggle_line(
    content: &str,
    line_index: usize,
    expected_state: bool,
) -> Result<Toggled, ToggleError> {
    let lines: Vec<&str> = content.split('\n').collect();
    let Some(line) = lines.get(line_index) else {
        return Err(ToggleError::LineOutOfBounds {
            line: line_index,
            lines: lines.len(),
        });
    };

    let Some(captures) = CHECKBOX_LINE.captures(line) else {
        return Err(ToggleError::NotACheckbox { line: line_index });
    };

    let actual = !captures[2].eq(" ");
    if actual != expected_state {
        return Err(ToggleError::Conflict {
            expected: expected_state,
            actual,
        });
    }

    let new_state = !actual;
    let marker = if new_state { "x" } else { " " };
    // Rebuild only the toggled line from its captured pieces; [4] would have
    // lost the spacing between "]" and the text, so slice the original line.
    let bracket_open_end = captures.get(1).map(|m| m.end()).unwrap_or(0);
    let bracket_close_start = captures.get(3).map(|m| m.start()).unwrap_or(0);
    let rebuilt = format!(
        "{}{}{}",
        &line[..bracket_open_end],
        marker,
        &line[bracket_close_start..]
    );

    let mut updated = lines;
    updated[line_index] = &rebuilt;
    Ok(Toggled {
        content: updated.join("\n"),
        new_state,
    })
}
