//! Derived views over the canonical task list
//!
//! The flat ordered `Vec<Task>` is the single source of truth; grouping by
//! user story and completion tallies are computed on demand rather than
//! stored alongside it.

use serde::Serialize;

use super::grammar::Task;
use crate::artifacts::spec::UserStory;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskGroup {
    /// `None` for the trailing "Other Tasks" group.
    pub story_id: Option<String>,
    pub story_title: String,
    pub tasks: Vec<Task>,
    pub completed_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskProgress {
    pub completed: usize,
    pub total: usize,
}

/// Completion tally over any task slice.
pub fn progress(tasks: &[Task]) -> TaskProgress {
    TaskProgress {
        completed: tasks.iter().filter(|task| task.completed).count(),
        total: tasks.len(),
    }
}

fn group_of(story_id: Option<String>, story_title: String, tasks: Vec<Task>) -> TaskGroup {
    let tally = progress(&tasks);
    TaskGroup {
        story_id,
        story_title,
        tasks,
        completed_count: tally.completed,
        total_count: tally.total,
    }
}

/// Group tasks by their user story marker.
///
/// Known stories come first in spec order, then stories referenced by tasks
/// but missing from the spec (the id doubles as the title), then an
/// "Other Tasks" group for unmarked tasks. Empty groups are omitted.
pub fn group_by_user_story(tasks: &[Task], stories: &[UserStory]) -> Vec<TaskGroup> {
    let mut groups = Vec::new();

    for story in stories {
        let story_tasks: Vec<Task> = tasks
            .iter()
            .filter(|task| task.user_story.as_deref() == Some(story.id.as_str()))
            .cloned()
            .collect();
        if !story_tasks.is_empty() {
            groups.push(group_of(
                Some(story.id.clone()),
                story.title.clone(),
                story_tasks,
            ));
        }
    }

    let known: Vec<&str> = stories.iter().map(|story| story.id.as_str()).collect();
    let mut unknown_ids: Vec<&str> = Vec::new();
    for task in tasks {
        if let Some(story_id) = task.user_story.as_deref() {
            if !known.contains(&story_id) && !unknown_ids.contains(&story_id) {
                unknown_ids.push(story_id);
            }
        }
    }
    for story_id in unknown_ids {
        let story_tasks: Vec<Task> = tasks
            .iter()
            .filter(|task| task.user_story.as_deref() == Some(story_id))
            .cloned()
            .collect();
        groups.push(group_of(
            Some(story_id.to_string()),
            story_id.to_string(),
            story_tasks,
        ));
    }

    let other_tasks: Vec<Task> = tasks
        .iter()
        .filter(|task| task.user_story.is_none())
        .cloned()
        .collect();
    if !other_tasks.is_empty() {
        groups.push(group_of(None, "Other Tasks".to_string(), other_tasks));
    }

    groups
}
