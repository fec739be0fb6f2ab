//! Constitution grammar over a complete document

use specdoc::artifacts::parse_constitution;

const CONSTITUTION: &str = "<!--\nSync Impact Report:\n- Version change: 1.0.0 → 1.1.0\n- Modified principles: III. UX First → III. UX Consistency\n- Added sections: Quality Standards\n- Removed sections: none\n- Templates requiring updates:\n  - ✅ updated: .specify/templates/plan-template.md\n- Follow-up TODOs: none\n-->\n\n# TodoList App Constitution\n\n## Core Principles\n\n### I. Component-First Architecture\n\nAll UI elements MUST be built as reusable components:\n\n- Components MUST be self-contained\n- Components MUST have a single responsibility\n\n**Rationale**: Reusable components reduce duplication.\n\n### II. Test-Driven Business Logic\n\nAll business logic MUST have unit tests.\n\n## Quality Standards\n\n### Code Quality Gates\n\n- Strict mode enabled\n- Zero lint warnings\n\n### Performance Budgets\n\n- Bundle under 100KB gzipped\n\n## Governance\n\nThis constitution supersedes all other practices.\n\n**Version**: 1.1.0 | **Ratified**: 2025-06-13 | **Last Amended**: 2025-07-16\n";

#[test]
fn principles_sections_and_footer() {
    let constitution = parse_constitution(CONSTITUTION);

    assert_eq!(constitution.title.as_deref(), Some("TodoList App Constitution"));
    assert_eq!(constitution.principles.len(), 2);
    assert_eq!(
        constitution.principles[0].name,
        "I. Component-First Architecture"
    );
    assert!(constitution.principles[0]
        .description
        .contains("- Components MUST be self-contained"));
    assert!(constitution.principles[0]
        .description
        .contains("**Rationale**"));

    let names: Vec<&str> = constitution
        .sections
        .iter()
        .map(|section| section.name.as_str())
        .collect();
    assert_eq!(names, vec!["Quality Standards", "Governance"]);
    assert_eq!(constitution.sections[0].subsections.len(), 2);
    assert_eq!(
        constitution.sections[0].subsections[1].name,
        "Performance Budgets"
    );

    assert_eq!(constitution.version.as_deref(), Some("1.1.0"));
    assert_eq!(constitution.ratified_date.as_deref(), Some("2025-06-13"));
    assert_eq!(constitution.last_amended_date.as_deref(), Some("2025-07-16"));
}

#[test]
fn bulleted_sync_report_dialect() {
    let report = parse_constitution(CONSTITUTION)
        .sync_impact_report
        .expect("report should parse");

    assert_eq!(report.version_change.as_deref(), Some("1.0.0 → 1.1.0"));
    assert_eq!(
        report.modified_principles.as_deref(),
        Some("III. UX First → III. UX Consistency")
    );
    assert_eq!(report.added_sections, vec!["Quality Standards"]);
    assert!(report.removed_sections.is_empty());
    assert_eq!(report.templates_status.len(), 1);
    assert_eq!(report.templates_status[0].status, "✅ updated");
    assert_eq!(report.follow_up_todos.as_deref(), Some("none"));
}

/// Unfilled generator scaffolding yields no principles.
#[test]
fn template_placeholders_produce_nothing() {
    let constitution =
        parse_constitution("## Core Principles\n\n### [PRINCIPLE_1_NAME]\n[PRINCIPLE_1_DESCRIPTION]\n");
    assert!(constitution.principles.is_empty());
}

#[test]
fn raw_content_keeps_the_comment() {
    let constitution = parse_constitution(CONSTITUTION);
    assert!(constitution.raw_content.contains("Sync Impact Report"));
    for principle in &constitution.principles {
        assert!(!principle.description.contains("<!--"));
    }
}
