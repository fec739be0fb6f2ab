//! Toggle engine contract: exact edits, optimistic-concurrency conflicts

use rstest::rstest;
use specdoc::checklist::{parse_checklist, toggle_line, ToggleError};

const CHECKLIST: &str = "# Release Checklist\n\n**Purpose**: pre-release gate\n\n- [ ] CHK001 Changelog updated\n- [x] CHK002 Version bumped\n  - [ ] CHK003 Lockfile refreshed\n";

#[test]
fn toggle_then_reparse_round_trips() {
    let parsed = parse_checklist(CHECKLIST);
    assert_eq!(parsed.progress.total, 3);
    assert_eq!(parsed.progress.completed, 1);

    let item = &parsed.items[0];
    let toggled = toggle_line(CHECKLIST, item.line, item.checked).expect("no concurrent edit");
    assert!(toggled.new_state);

    let reparsed = parse_checklist(&toggled.content);
    assert_eq!(reparsed.progress.completed, 2);
    assert_eq!(reparsed.items[0].text, "CHK001 Changelog updated");
}

/// A checked line toggled with `expected = false` must conflict and leave
/// the content alone.
#[test]
fn stale_expectation_conflicts_without_mutation() {
    let line = parse_checklist(CHECKLIST)
        .items
        .iter()
        .find(|item| item.checked)
        .map(|item| item.line)
        .expect("fixture has a checked item");

    let result = toggle_line(CHECKLIST, line, false);
    assert_eq!(
        result,
        Err(ToggleError::Conflict {
            expected: false,
            actual: true
        })
    );
}

#[test]
fn only_the_requested_line_changes() {
    let toggled = toggle_line(CHECKLIST, 4, false).expect("line 4 is unchecked");

    let before: Vec<&str> = CHECKLIST.split('\n').collect();
    let after: Vec<&str> = toggled.content.split('\n').collect();
    assert_eq!(before.len(), after.len());
    for (index, (old, new)) in before.iter().zip(&after).enumerate() {
        if index == 4 {
            assert_eq!(*new, "- [x] CHK001 Changelog updated");
        } else {
            assert_eq!(old, new);
        }
    }
}

#[rstest]
#[case(0, ToggleError::NotACheckbox { line: 0 })]
#[case(1, ToggleError::NotACheckbox { line: 1 })]
#[case(99, ToggleError::LineOutOfBounds { line: 99, lines: 8 })]
fn non_checkbox_targets_are_refused(#[case] line: usize, #[case] expected: ToggleError) {
    assert_eq!(toggle_line(CHECKLIST, line, false), Err(expected));
}

#[test]
fn double_toggle_restores_the_original() {
    let once = toggle_line(CHECKLIST, 4, false).unwrap();
    let twice = toggle_line(&once.content, 4, true).unwrap();
    assert_eq!(twice.content, CHECKLIST);
}
