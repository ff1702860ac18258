//! Field recovery from extracted plain text.
//!
//! Pipeline: non-blank lines → name guess → contacts → sections → skills and
//! capped section blocks. Missing structure yields empty fields, never errors.

pub mod contacts;
pub mod name;
pub mod sections;
pub mod skills;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use contacts::ContactSet;
pub use sections::SectionKey;

use crate::parsing::contacts::find_contacts;
use crate::parsing::name::guess_name;
use crate::parsing::sections::{sectionize, Sections};
use crate::parsing::skills::split_skills;

const ABOUT_MAX_CHARS: usize = 1400;
const RAW_PREVIEW_LINES: usize = 90;

/// Line caps for the verbatim section blocks.
const BLOCK_LIMITS: [(SectionKey, usize); 5] = [
    (SectionKey::Experience, 120),
    (SectionKey::Projects, 120),
    (SectionKey::Education, 90),
    (SectionKey::Certifications, 70),
    (SectionKey::Languages, 30),
];

/// Everything recovered from one résumé's text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    pub name: Option<String>,
    pub contacts: ContactSet,
    pub about: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub projects: String,
    pub education: String,
    pub certifications: String,
    pub languages: String,
    pub raw_preview: String,
    pub sections_detected: BTreeMap<SectionKey, usize>,
}

impl StructuredRecord {
    pub fn section_lines(&self, key: SectionKey) -> usize {
        self.sections_detected.get(&key).copied().unwrap_or(0)
    }
}

/// Collapses every whitespace run to one space and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Line boundaries: `\n`, `\r`, vertical tab, form feed, the ASCII
/// file/group/record separators, NEL and the Unicode line/paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}'
    )
}

/// Trimmed, non-blank lines in order.
pub fn lines_from_text(text: &str) -> Vec<&str> {
    text.split(is_line_break)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}

pub fn extract_structured(text: &str) -> StructuredRecord {
    if text.trim().is_empty() {
        return StructuredRecord::default();
    }

    let lines = lines_from_text(text);
    let sections = sectionize(&lines);

    let about_source = sections
        .lines(SectionKey::Summary)
        .join(" ")
        .chars()
        .take(ABOUT_MAX_CHARS)
        .collect::<String>();

    let block = |key: SectionKey| -> String {
        let limit = BLOCK_LIMITS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, limit)| *limit)
            .unwrap_or(0);
        capped_block(&sections, key, limit)
    };

    StructuredRecord {
        name: guess_name(&lines),
        contacts: find_contacts(text),
        about: collapse_whitespace(&about_source),
        skills: split_skills(sections.lines(SectionKey::Skills)),
        experience: block(SectionKey::Experience),
        projects: block(SectionKey::Projects),
        education: block(SectionKey::Education),
        certifications: block(SectionKey::Certifications),
        languages: block(SectionKey::Languages),
        raw_preview: lines
            .iter()
            .take(RAW_PREVIEW_LINES)
            .copied()
            .collect::<Vec<_>>()
            .join("\n"),
        sections_detected: sections.detected(),
    }
}

fn capped_block(sections: &Sections, key: SectionKey, limit: usize) -> String {
    let lines = sections.lines(key);
    lines[..lines.len().min(limit)].join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
Jane Doe
jane.doe@example.com | +44 20 7946 0958 | linkedin.com/in/janedoe

Summary
Backend engineer   with a focus on
reliable systems.

Skills
Languages: Rust, Go, Python,
Tools: Docker / Kubernetes

Experience
Acme Corp — Senior Engineer (2020 - 2024)
• Cut p99 latency by 40%

Education
BSc Computer Science, 2016
";

    #[test]
    fn test_full_record() {
        let r = extract_structured(RESUME);
        assert_eq!(r.name.as_deref(), Some("Jane Doe"));
        assert_eq!(r.contacts.emails, ["jane.doe@example.com"]);
        assert_eq!(r.contacts.linkedin, ["linkedin.com/in/janedoe"]);
        assert_eq!(r.about, "Backend engineer with a focus on reliable systems.");
        assert_eq!(r.skills, ["Rust", "Go", "Python", "Docker", "Kubernetes"]);
        assert_eq!(
            r.experience,
            "Acme Corp — Senior Engineer (2020 - 2024)\n• Cut p99 latency by 40%"
        );
        assert_eq!(r.education, "BSc Computer Science, 2016");
        assert!(r.projects.is_empty());
        assert_eq!(r.section_lines(SectionKey::Skills), 2);
        assert_eq!(r.section_lines(SectionKey::Projects), 0);
        assert!(r.raw_preview.starts_with("Jane Doe\njane.doe@example.com"));
    }

    #[test]
    fn test_lines_split_on_every_line_break() {
        assert_eq!(
            lines_from_text("Skills\rPython, Go\r\nRust\u{0c}Education\u{2028}BSc"),
            ["Skills", "Python, Go", "Rust", "Education", "BSc"]
        );
        let r = extract_structured("Skills\rPython, Go");
        assert_eq!(r.section_lines(SectionKey::Skills), 1);
        assert_eq!(r.skills, ["Python", "Go"]);
    }

    #[test]
    fn test_skills_scenario() {
        let r = extract_structured("Skills\nPython, Go, Rust");
        assert_eq!(r.section_lines(SectionKey::Skills), 1);
        assert_eq!(r.skills, ["Python", "Go", "Rust"]);
    }

    #[test]
    fn test_empty_text_gives_empty_record() {
        let r = extract_structured("  \n ");
        assert_eq!(r, StructuredRecord::default());
        assert!(r.sections_detected.is_empty());
    }

    #[test]
    fn test_blocks_are_line_capped() {
        let mut text = String::from("Languages\n");
        for i in 0..40 {
            text.push_str(&format!("Language {i}\n"));
        }
        let r = extract_structured(&text);
        assert_eq!(r.languages.lines().count(), 30);
        assert_eq!(r.section_lines(SectionKey::Languages), 40);
    }

    #[test]
    fn test_about_truncated_before_collapse() {
        let text = format!("Summary\n{}", "word ".repeat(400));
        let r = extract_structured(&text);
        assert!(r.about.chars().count() <= ABOUT_MAX_CHARS);
        assert!(r.about.starts_with("word word"));
    }

    #[test]
    fn test_raw_preview_capped() {
        let text = (0..120).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let r = extract_structured(&text);
        assert_eq!(r.raw_preview.lines().count(), RAW_PREVIEW_LINES);
    }

    #[test]
    fn test_sections_detected_serializes_with_snake_case_keys() {
        let r = extract_structured("Skills\nRust");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["sections_detected"]["skills"], 1);
        assert_eq!(json["sections_detected"]["certifications"], 0);
        assert!(json["name"].is_null());
    }
}
