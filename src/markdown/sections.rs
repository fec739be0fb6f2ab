//! Section lookup over the flat section list
//!
//! Heading wording drifts between authors and generated drafts
//! ("Prerequisites" vs "Pre-requisites needed"), so lookups are
//! case-insensitive substring matches, first match wins. Grammars keep their
//! accepted synonyms in one vocabulary slice and resolve it through
//! [`find_section_any`], so synonym lists stay declarative and testable apart
//! from the extraction logic.

use super::tree::Section;

/// Find a section by title, case-insensitive substring match.
pub fn find_section<'a>(sections: &'a [Section], needle: &str) -> Option<&'a Section> {
    let needle = needle.to_lowercase();
    sections
        .iter()
        .find(|section| section.title.to_lowercase().contains(&needle))
}

/// All sections whose title matches, in document order.
pub fn find_sections<'a>(sections: &'a [Section], needle: &str) -> Vec<&'a Section> {
    let needle = needle.to_lowercase();
    sections
        .iter()
        .filter(|section| section.title.to_lowercase().contains(&needle))
        .collect()
}

/// Resolve a vocabulary of accepted titles to the first section that matches.
pub fn find_section_any<'a>(sections: &'a [Section], needles: &[&str]) -> Option<&'a Section> {
    needles
        .iter()
        .find_map(|needle| find_section(sections, needle))
}

/// The contiguous run of sections nested directly under `parent`.
///
/// Returns sections whose depth is exactly `parent.depth + 1`, stopping at
/// the first section at the parent's depth or shallower. Deeper descendants
/// are excluded; callers that need them recurse.
pub fn get_subsections<'a>(parent: &Section, all: &'a [Section]) -> Vec<&'a Section> {
    let Some(index) = all
        .iter()
        .position(|section| std::ptr::eq(section, parent))
    else {
        return Vec::new();
    };

    let mut subsections = Vec::new();
    for section in &all[index + 1..] {
        if section.depth <= parent.depth {
            break;
        }
        if section.depth == parent.depth + 1 {
            subsections.push(section);
        }
    }
    subsections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::tree::parse_sections;

    #[test]
    fn lookup_is_case_insensitive_substring() {
        let sections = parse_sections("## User Scenarios & Testing\n\nText.\n");
        assert!(find_section(&sections, "user scenarios").is_some());
        assert!(find_section(&sections, "Testing").is_some());
        assert!(find_section(&sections, "Requirements").is_none());
    }

    #[test]
    fn vocabulary_resolves_first_match() {
        let sections = parse_sections("## User Stories\n\nText.\n");
        let found = find_section_any(&sections, &["user scenarios", "user stories"]);
        assert_eq!(found.map(|s| s.title.as_str()), Some("User Stories"));
    }

    #[test]
    fn subsections_stop_at_sibling() {
        let md = "## Parent\n\n### A\n\n#### Deep\n\n### B\n\n## Next\n\n### Not Mine\n";
        let sections = parse_sections(md);
        let parent = find_section(&sections, "Parent").unwrap();
        let subs = get_subsections(parent, &sections);

        let titles: Vec<_> = subs.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn subsections_of_unknown_parent_are_empty() {
        let sections = parse_sections("## One\n");
        let orphan = Section {
            title: "Orphan".to_string(),
            depth: 2,
            children: Vec::new(),
        };
        assert!(get_subsections(&orphan, &sections).is_empty());
    }
}
