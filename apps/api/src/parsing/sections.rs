//! Heading detection by exact alias match.
//!
//! A line is a heading only when the whole line (minus bullets and trailing
//! colons) equals a known alias, so sentences that merely mention "experience"
//! stay in their section.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Canonical résumé sections. Declaration order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
    Languages,
}

impl SectionKey {
    pub const ALL: [SectionKey; 7] = [
        SectionKey::Summary,
        SectionKey::Skills,
        SectionKey::Experience,
        SectionKey::Education,
        SectionKey::Projects,
        SectionKey::Certifications,
        SectionKey::Languages,
    ];

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            SectionKey::Summary => &[
                "summary",
                "profile",
                "about",
                "about me",
                "professional summary",
                "career summary",
                "objective",
            ],
            SectionKey::Skills => &[
                "skills",
                "technical skills",
                "core skills",
                "key skills",
                "competencies",
                "tools",
                "technologies",
            ],
            SectionKey::Experience => &[
                "experience",
                "work experience",
                "employment",
                "professional experience",
                "work history",
                "internship",
            ],
            SectionKey::Education => &[
                "education",
                "academics",
                "academic background",
                "qualifications",
            ],
            SectionKey::Projects => &["projects", "personal projects", "selected projects"],
            SectionKey::Certifications => &["certifications", "certificates", "licenses", "training"],
            SectionKey::Languages => &["languages", "language"],
        }
    }

    /// The alias used when rendering a section back to text.
    #[cfg(test)]
    pub fn heading(self) -> &'static str {
        self.aliases()[0]
    }
}

/// Lowercase alias → section. Built on first use, never mutated.
static ALIAS_TABLE: Lazy<HashMap<&'static str, SectionKey>> = Lazy::new(|| {
    SectionKey::ALL
        .iter()
        .flat_map(|&key| key.aliases().iter().map(move |&alias| (alias, key)))
        .collect()
});

const MAX_HEADING_CHARS: usize = 44;
const HEADING_TRIM: &[char] = &[':', '-', '•', '*', ' '];

/// Returns the section a line introduces, if it is a heading.
pub fn heading_key(line: &str) -> Option<SectionKey> {
    let lowered = line.to_lowercase();
    let candidate = lowered.trim_matches(HEADING_TRIM).trim();
    if candidate.chars().count() > MAX_HEADING_CHARS {
        return None;
    }
    ALIAS_TABLE.get(candidate).copied()
}

/// Lines grouped under the heading that precedes them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub by_key: BTreeMap<SectionKey, Vec<String>>,
    /// Lines seen before the first heading.
    pub unknown: Vec<String>,
}

impl Sections {
    pub fn lines(&self, key: SectionKey) -> &[String] {
        self.by_key.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Line counts for every known section, zero when the heading never appeared.
    pub fn detected(&self) -> BTreeMap<SectionKey, usize> {
        SectionKey::ALL
            .iter()
            .map(|&key| (key, self.lines(key).len()))
            .collect()
    }
}

/// Walks lines in order, switching the current section on each heading.
pub fn sectionize<S: AsRef<str>>(lines: &[S]) -> Sections {
    let mut sections = Sections::default();
    let mut current: Option<SectionKey> = None;

    for line in lines {
        let line = line.as_ref();
        if let Some(key) = heading_key(line) {
            current = Some(key);
            sections.by_key.entry(key).or_default();
            continue;
        }
        match current {
            Some(key) => sections.by_key.entry(key).or_default().push(line.to_string()),
            None => sections.unknown.push(line.to_string()),
        }
    }

    sections
}
