//! Prefix lexer for checkbox task lines
//!
//! A task line is `- [ ] T001 [P] [US1] description...`. Only the prefix has
//! grammar; the description is free text. Tokenization stops at the first
//! word that is not part of the prefix and hands the remainder back to the
//! caller untouched.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
pub enum PrefixToken {
    /// `- [ ]`, `- [x]`, `- [X]` (indentation and inner spacing tolerated)
    #[regex(r"-\s*\[[ xX]\]")]
    Checkbox,

    /// Task identifier: `T` followed by digits.
    #[regex(r"T[0-9]+")]
    TaskId,

    /// Parallel-execution marker.
    #[token("[P]")]
    Parallel,

    /// User-story marker: `[US1]`, `[US15]`, ...
    #[regex(r"\[US[0-9]+\]")]
    StoryMarker,
}

/// The machine-readable prefix of one task line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPrefix {
    pub completed: bool,
    pub id: String,
    pub parallel: bool,
    pub user_story: Option<String>,
    /// Byte offset where the free-text description starts.
    pub description_start: usize,
}

/// Lex the prefix of a candidate task line.
///
/// Returns `None` unless the line opens with a checkbox followed by a task
/// id; any other shape is not a task line. The optional `[P]` and `[USn]`
/// markers are consumed only in that order, matching how the documents are
/// authored.
pub fn lex_task_prefix(line: &str) -> Option<TaskPrefix> {
    let mut lexer = PrefixToken::lexer(line);

    match lexer.next() {
        Some(Ok(PrefixToken::Checkbox)) => {}
        _ => return None,
    }
    let completed = lexer.slice().chars().any(|c| c == 'x' || c == 'X');

    let id = match lexer.next() {
        Some(Ok(PrefixToken::TaskId)) => lexer.slice().to_string(),
        _ => return None,
    };

    let mut parallel = false;
    let mut user_story = None;

    let mut probe = lexer.clone();
    if let Some(Ok(PrefixToken::Parallel)) = probe.next() {
        parallel = true;
        lexer = probe;
    }

    let mut probe = lexer.clone();
    if let Some(Ok(PrefixToken::StoryMarker)) = probe.next() {
        let slice = probe.slice();
        user_story = Some(slice[1..slice.len() - 1].to_string());
        lexer = probe;
    }

    Some(TaskPrefix {
        completed,
        id,
        parallel,
        user_story,
        description_start: lexer.span().end,
    })
}
