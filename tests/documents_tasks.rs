//! Task-list grammar over complete documents
//!
//! Exercises the line grammar end to end: phase segmentation, marker
//! precedence, narrative interleaving, and line-position preservation.

use rstest::rstest;
use specdoc::tasks::{group_by_user_story, parse_task_line, parse_tasks, PhaseContent};

const TASKS: &str = "# Tasks: Planning Board\n\n**Input**: Design documents from `/specs/001-board/`\n\n## Phase 1: Setup\n\n**Purpose**: project scaffolding\n\n- [x] T001 Initialize workspace\n- [ ] T002 [P] Configure linters in .eslintrc.json\n\n## Phase 2: US1 – Create Tasks\n\nTasks for the first story.\n\n- [ ] T003 Create task model in src/lib/model.ts\n- [ ] T004 [P] [US2] Shared helper\n\n## Dependencies\n\n- Phase 2 depends on Phase 1\n";

#[test]
fn phases_and_flat_list_agree() {
    let parsed = parse_tasks(TASKS);

    assert_eq!(parsed.tasks.len(), 4);
    assert_eq!(parsed.phases.len(), 3);
    assert_eq!(parsed.phases[0].name, "Phase 1: Setup");
    assert_eq!(parsed.phases[0].tasks().count(), 2);
    assert_eq!(parsed.phases[2].name, "Dependencies");
    assert_eq!(parsed.phases[2].tasks().count(), 0);

    let phase_task_ids: Vec<&str> = parsed
        .phases
        .iter()
        .flat_map(|phase| phase.tasks().map(|task| task.id.as_str()))
        .collect();
    let flat_ids: Vec<&str> = parsed.tasks.iter().map(|task| task.id.as_str()).collect();
    assert_eq!(phase_task_ids, flat_ids);
}

#[test]
fn narrative_blocks_keep_interleaved_order() {
    let parsed = parse_tasks(TASKS);
    let phase = &parsed.phases[0];

    assert!(matches!(
        &phase.content_blocks[0],
        PhaseContent::Markdown(text) if text.contains("**Purpose**")
    ));
    assert!(matches!(&phase.content_blocks[1], PhaseContent::Task(task) if task.id == "T001"));
    assert!(matches!(&phase.content_blocks[2], PhaseContent::Task(task) if task.id == "T002"));
}

/// Re-reading each recorded line yields the same task: positions are exact.
#[test]
fn recorded_lines_point_back_at_their_tasks() {
    let parsed = parse_tasks(TASKS);
    let lines: Vec<&str> = TASKS.lines().collect();

    for task in &parsed.tasks {
        let reparsed = parse_task_line(lines[task.line], task.line)
            .unwrap_or_else(|| panic!("line {} no longer parses", task.line));
        assert_eq!(reparsed.id, task.id);
        assert_eq!(reparsed.completed, task.completed);
    }

    let mut positions: Vec<usize> = parsed.tasks.iter().map(|task| task.line).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    positions.dedup();
    assert_eq!(positions.len(), parsed.tasks.len());
}

#[test]
fn explicit_marker_beats_phase_inference() {
    let parsed = parse_tasks("## Phase 1: US1 – Create\n- [ ] T001 [US2] Task\n");
    assert_eq!(parsed.tasks[0].user_story.as_deref(), Some("US2"));
}

#[test]
fn metadata_rides_on_the_parsed_record() {
    let parsed = parse_tasks(TASKS);
    assert_eq!(
        parsed.metadata,
        vec![(
            "Input".to_string(),
            "Design documents from `/specs/001-board/`".to_string()
        )]
    );
}

#[rstest]
#[case("- [ ] T001 Implement feature", "T001", false, false, None)]
#[case("- [x] T002 Fix bug", "T002", true, false, None)]
#[case("- [X] T003 Update docs", "T003", true, false, None)]
#[case("- [ ] T004 [P] Parallel task", "T004", false, true, None)]
#[case("- [ ] T006 [US1] Story task", "T006", false, false, Some("US1"))]
#[case("- [ ] T007 [P] [US2] Combined", "T007", false, true, Some("US2"))]
#[case("- [ ] T008 [US15] Multi-digit", "T008", false, false, Some("US15"))]
fn task_line_variants(
    #[case] line: &str,
    #[case] id: &str,
    #[case] completed: bool,
    #[case] parallel: bool,
    #[case] story: Option<&str>,
) {
    let task = parse_task_line(line, 0).expect("task line should parse");
    assert_eq!(task.id, id);
    assert_eq!(task.completed, completed);
    assert_eq!(task.parallel, parallel);
    assert_eq!(task.user_story.as_deref(), story);
}

#[rstest]
#[case("## Phase 1: Setup")]
#[case("Some random text")]
#[case("")]
#[case("- Regular list item")]
#[case("- [ ] No task ID here")]
fn non_task_lines_are_rejected(#[case] line: &str) {
    assert!(parse_task_line(line, 0).is_none());
}

#[test]
fn grouping_derives_from_the_flat_list() {
    let parsed = parse_tasks(TASKS);
    let spec = specdoc::artifacts::parse_spec(
        "### User Story 1 - Create Tasks (Priority: P1)\n\nBody.\n\n### User Story 2 - Edit Tasks (Priority: P2)\n\nBody.\n",
    );

    let groups = group_by_user_story(&parsed.tasks, &spec.user_stories);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].story_id.as_deref(), Some("US1"));
    assert_eq!(groups[0].tasks.len(), 1);
    assert_eq!(groups[1].story_id.as_deref(), Some("US2"));
    assert_eq!(groups[2].story_title, "Other Tasks");
    assert_eq!(groups[2].tasks.len(), 2);
}
