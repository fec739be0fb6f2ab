//! Property tests: totality, projection stability, depth containment
//!
//! Every grammar must return a record for any string at all, including
//! truncated generator output and binary garbage. Structural properties of
//! the section utilities are checked against generated documents.

use proptest::prelude::*;

use specdoc::artifacts::{
    parse_constitution, parse_contract, parse_data_model, parse_plan, parse_quickstart,
    parse_research, parse_spec,
};
use specdoc::checklist::{parse_checklist, toggle_line};
use specdoc::markdown::{find_section, get_subsections, parse_sections};
use specdoc::tasks::parse_tasks;

proptest! {
    /// No grammar panics, for any input whatsoever.
    #[test]
    fn grammars_are_total(text in "\\PC{0,400}") {
        parse_spec(&text);
        parse_plan(&text);
        parse_tasks(&text);
        parse_data_model(&text);
        parse_quickstart(&text);
        parse_research(&text);
        parse_contract(&text);
        parse_constitution(&text);
        parse_checklist(&text);
    }

    /// The toggle never panics either; it only ever answers.
    #[test]
    fn toggle_is_total(text in "\\PC{0,200}", line in 0usize..64, expected in any::<bool>()) {
        let _ = toggle_line(&text, line, expected);
    }

    /// Repeated parsing and lookup always yield the same sections.
    #[test]
    fn projection_is_stable(text in "[a-zA-Z#\\- \n]{0,300}") {
        let first = parse_sections(&text);
        let second = parse_sections(&text);
        prop_assert_eq!(&first, &second);

        if let Some(section) = first.first() {
            let by_title = find_section(&first, &section.title);
            prop_assert!(by_title.is_some());
        }
    }
}

/// A generated document built from heading and paragraph lines.
fn document_strategy() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        (1usize..=4, "[a-z]{1,8}").prop_map(|(depth, title)| {
            format!("{} {}", "#".repeat(depth), title)
        }),
        "[a-z ]{1,20}".prop_map(|text| text),
        ("T[0-9]{1,3}", any::<bool>(), "[a-z ]{1,12}").prop_map(|(id, done, text)| {
            format!("- [{}] {} {}", if done { "x" } else { " " }, id, text)
        }),
    ];
    proptest::collection::vec(line, 0..24).prop_map(|lines| lines.join("\n\n"))
}

proptest! {
    /// Depth containment: every subsection sits exactly one level below its
    /// parent, and the run stops at the first sibling-or-shallower section.
    #[test]
    fn subsections_are_depth_contained(text in document_strategy()) {
        let sections = parse_sections(&text);

        for parent in &sections {
            let subsections = get_subsections(parent, &sections);
            for subsection in &subsections {
                prop_assert_eq!(subsection.depth, parent.depth + 1);
            }

            // Nothing after the run's terminator may be included.
            let parent_index = sections
                .iter()
                .position(|section| std::ptr::eq(section, parent))
                .unwrap();
            let terminator = sections[parent_index + 1..]
                .iter()
                .position(|section| section.depth <= parent.depth);
            if let (Some(terminator), Some(last)) = (terminator, subsections.last()) {
                let last_index = sections
                    .iter()
                    .position(|section| std::ptr::eq(section, *last))
                    .unwrap();
                prop_assert!(last_index <= parent_index + terminator);
            }
        }
    }

    /// The flat task list preserves source order and line identity.
    #[test]
    fn task_lines_stay_ordered(text in document_strategy()) {
        let parsed = parse_tasks(&text);
        let lines: Vec<&str> = text.lines().collect();
        let mut previous = None;
        for task in &parsed.tasks {
            prop_assert!(task.line < lines.len());
            if let Some(previous) = previous {
                prop_assert!(task.line > previous);
            }
            previous = Some(task.line);
        }
    }
}
