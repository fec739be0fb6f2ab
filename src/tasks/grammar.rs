//! Line-oriented grammar for the task list
//!
//! tasks.md is the one artifact not parsed through the content tree. Its
//! checkbox dialect is not CommonMark, and later point-edits need each task's
//! exact source line, so the grammar walks the document line by line:
//!
//! 1. `## <name>` starts a new phase (pending narrative is flushed first).
//! 2. A checkbox line parses as a [`Task`]; a trailing file-extension token
//!    is lifted out as `file_path`.
//! 3. A task without an explicit `[USn]` marker inherits the story named in
//!    its phase heading (`US1 – Create`); an explicit marker always wins.
//! 4. Any other non-empty line buffers as narrative and flushes as one
//!    markdown block, preserving the authored interleaving of prose and
//!    tasks.
//!
//! Phases with no content at all are dropped. A document with no `##`
//! headings yields a flat task list and zero phases.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::line_lexer::lex_task_prefix;
use crate::markdown::extract_metadata;

/// One checkbox task. Identity is `id`; the parser does not enforce
/// uniqueness. `line` is the 0-based source line the task was read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub completed: bool,
    pub parallel: bool,
    pub user_story: Option<String>,
    pub file_path: Option<String>,
    pub line: usize,
}

/// Narrative and tasks in authored order within one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PhaseContent {
    Markdown(String),
    Task(Task),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPhase {
    pub name: String,
    pub content_blocks: Vec<PhaseContent>,
}

impl TaskPhase {
    /// The phase's tasks, in order, skipping narrative blocks.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.content_blocks.iter().filter_map(|block| match block {
            PhaseContent::Task(task) => Some(task),
            PhaseContent::Markdown(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTasks {
    pub raw_content: String,
    pub metadata: Vec<(String, String)>,
    pub tasks: Vec<Task>,
    pub phases: Vec<TaskPhase>,
}

static PHASE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^##\s+(.+)$").expect("phase heading pattern"));

static PHASE_STORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(US\d+)\s*[\-–]").expect("phase story pattern"));

static TRAILING_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([^\s]+\.[a-z]+)$").expect("file path pattern"));

/// Parse one task line. `None` for anything that is not a task.
pub fn parse_task_line(line: &str, line_index: usize) -> Option<Task> {
    let prefix = lex_task_prefix(line)?;
    let description = line[prefix.description_start..].trim().to_string();

    let file_path = TRAILING_FILE
        .captures(&description)
        .map(|captures| captures[1].to_string());

    Some(Task {
        id: prefix.id,
        description,
        completed: prefix.completed,
        parallel: prefix.parallel,
        user_story: prefix.user_story,
        file_path,
        line: line_index,
    })
}

/// Story id named in a phase heading, e.g. `Phase 2: US1 – Create`.
fn story_from_phase_name(name: &str) -> Option<String> {
    PHASE_STORY
        .captures(name)
        .map(|captures| captures[1].to_uppercase())
}

/// Parse a complete tasks.md document.
pub fn parse_tasks(text: &str) -> ParsedTasks {
    let mut tasks: Vec<Task> = Vec::new();
    let mut phases: Vec<TaskPhase> = Vec::new();

    let mut current: Option<TaskPhase> = None;
    let mut current_story: Option<String> = None;
    let mut narrative: Vec<&str> = Vec::new();

    fn flush_narrative(narrative: &mut Vec<&str>, phase: &mut Option<TaskPhase>) {
        if narrative.is_empty() {
            return;
        }
        let text = narrative.join("\n");
        narrative.clear();
        if let Some(phase) = phase.as_mut() {
            phase.content_blocks.push(PhaseContent::Markdown(text));
        }
    }

    fn finish_phase(phase: &mut Option<TaskPhase>, phases: &mut Vec<TaskPhase>) {
        if let Some(phase) = phase.take() {
            if !phase.content_blocks.is_empty() {
                phases.push(phase);
            }
        }
    }

    for (index, line) in text.lines().enumerate() {
        if let Some(captures) = PHASE_HEADING.captures(line) {
            flush_narrative(&mut narrative, &mut current);
            finish_phase(&mut current, &mut phases);

            let name = captures[1].trim().to_string();
            current_story = story_from_phase_name(&name);
            current = Some(TaskPhase {
                name,
                content_blocks: Vec::new(),
            });
            continue;
        }

        if let Some(mut task) = parse_task_line(line, index) {
            flush_narrative(&mut narrative, &mut current);
            if task.user_story.is_none() {
                task.user_story = current_story.clone();
            }
            tasks.push(task.clone());
            if let Some(phase) = current.as_mut() {
                phase.content_blocks.push(PhaseContent::Task(task));
            }
            continue;
        }

        if !line.trim().is_empty() {
            narrative.push(line);
        }
    }

    flush_narrative(&mut narrative, &mut current);
    finish_phase(&mut current, &mut phases);

    ParsedTasks {
        raw_content: text.to_string(),
        metadata: extract_metadata(text),
        tasks,
        phases,
    }
}
