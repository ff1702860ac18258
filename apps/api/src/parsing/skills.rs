use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::collapse_whitespace;

pub const MAX_SKILLS: usize = 70;
pub const MAX_SKILL_CHARS: usize = 45;

/// Category labels such as "Frontend:" or "Cloud & DevOps:".
static CATEGORY_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z][A-Za-z\s/&-]{2,30}:\s*").expect("valid regex"));

static DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[•·\u{2022}|\n,;/]+").expect("valid regex"));

/// Splits the skills section into individual, de-duplicated skill names.
///
/// First spelling wins on case-insensitive duplicates; at most 70 entries survive.
pub fn split_skills<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let joined = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let without_labels = CATEGORY_LABEL.replace_all(&joined, "");

    let mut seen = HashSet::new();
    DELIMITERS
        .split(&without_labels)
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty() && s.chars().count() <= MAX_SKILL_CHARS)
        .filter(|s| seen.insert(s.to_lowercase()))
        .take(MAX_SKILLS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_comma_separated() {
        assert_eq!(split_skills(&["Python, Go, Rust"]), ["Python", "Go", "Rust"]);
    }

    #[test]
    fn test_category_labels_removed() {
        let lines = ["Frontend: React | TypeScript,", "Cloud & DevOps: AWS; Docker • K8s"];
        assert_eq!(
            split_skills(&lines),
            ["React", "TypeScript", "AWS", "Docker", "K8s"]
        );
    }

    #[test]
    fn test_case_insensitive_dedup_keeps_first_spelling() {
        assert_eq!(split_skills(&["SQL, sql, Sql, Go"]), ["SQL", "Go"]);
    }

    #[test]
    fn test_overlong_tokens_dropped() {
        let long = "a".repeat(46);
        let line = format!("Rust, {long}, Go");
        assert_eq!(split_skills(&[line]), ["Rust", "Go"]);
    }

    #[test]
    fn test_slash_splits_pairs() {
        assert_eq!(split_skills(&["CI/CD"]), ["CI", "CD"]);
    }

    #[test]
    fn test_capped_at_seventy() {
        let line = (0..100).map(|i| format!("skill{i}")).collect::<Vec<_>>().join(", ");
        let skills = split_skills(&[line]);
        assert_eq!(skills.len(), MAX_SKILLS);
        assert_eq!(skills[0], "skill0");
    }

    #[test]
    fn test_empty_section() {
        assert!(split_skills::<&str>(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_skills_bounded_and_unique(lines in proptest::collection::vec(".{0,200}", 0..20)) {
            let skills = split_skills(&lines);
            prop_assert!(skills.len() <= MAX_SKILLS);
            let mut lowered = HashSet::new();
            for s in &skills {
                prop_assert!(s.chars().count() <= MAX_SKILL_CHARS);
                prop_assert!(!s.is_empty());
                prop_assert!(lowered.insert(s.to_lowercase()));
            }
        }
    }
}
