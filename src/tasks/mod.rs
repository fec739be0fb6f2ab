//! Task-list parsing: line grammar, prefix lexer, derived groupings

pub mod grammar;
pub mod grouping;
pub mod line_lexer;

pub use grammar::{parse_task_line, parse_tasks, ParsedTasks, PhaseContent, Task, TaskPhase};
pub use grouping::{group_by_user_story, progress, TaskGroup, TaskProgress};
