use std::collections::BTreeSet;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MAX_PHONES: usize = 3;
const MIN_PHONE_DIGITS: usize = 9;
const MAX_PROFILE_LINKS: usize = 2;
const MAX_PORTFOLIO_LINKS: usize = 2;
const MIN_PORTFOLIO_CHARS: usize = 10;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b").expect("valid regex")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?:\+|00)\d{1,3}[\s\-]?)?(?:\(?\d{2,4}\)?[\s\-]?)?\d{3,4}[\s\-]?\d{3,4}\b")
        .expect("valid regex")
});

static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://)?(www\.)?linkedin\.com/[A-Za-z0-9_/\-%.]+").expect("valid regex")
});

static GITHUB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://)?(www\.)?github\.com/[A-Za-z0-9_\-%.]+").expect("valid regex")
});

static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:https?://)?[A-Za-z0-9.-]+\.[A-Za-z]{2,}(?:/[A-Za-z0-9_/\-%.]+)?\b")
        .expect("valid regex")
});

/// Contact channels found anywhere in the text. Every list is sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactSet {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub linkedin: Vec<String>,
    pub github: Vec<String>,
    pub portfolio: Vec<String>,
}

impl ContactSet {
    pub fn has_profile_link(&self) -> bool {
        !(self.linkedin.is_empty() && self.github.is_empty() && self.portfolio.is_empty())
    }
}

pub fn find_contacts(text: &str) -> ContactSet {
    let email_spans: Vec<Range<usize>> = EMAIL.find_iter(text).map(|m| m.range()).collect();
    let emails = sorted_unique(EMAIL.find_iter(text).map(|m| m.as_str().to_string()));

    let phones = sorted_unique(PHONE.find_iter(text).map(|m| m.as_str().trim().to_string()))
        .into_iter()
        .filter(|p| p.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS)
        .take(MAX_PHONES)
        .collect();

    let linkedin = first_sorted(&LINKEDIN, text, MAX_PROFILE_LINKS);
    let github = first_sorted(&GITHUB, text, MAX_PROFILE_LINKS);

    let portfolio = sorted_unique(
        URL.find_iter(text)
            .filter(|m| !email_spans.iter().any(|span| overlaps(span, &m.range())))
            .map(|m| m.as_str())
            .filter(|u| is_portfolio_candidate(u))
            .map(str::to_string),
    )
    .into_iter()
    .take(MAX_PORTFOLIO_LINKS)
    .collect();

    ContactSet {
        emails,
        phones,
        linkedin,
        github,
        portfolio,
    }
}

fn is_portfolio_candidate(url: &str) -> bool {
    let lowered = url.to_lowercase();
    !lowered.contains("linkedin.com")
        && !lowered.contains("github.com")
        && !url.contains('@')
        && url.chars().count() >= MIN_PORTFOLIO_CHARS
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn sorted_unique(items: impl Iterator<Item = String>) -> Vec<String> {
    items.collect::<BTreeSet<_>>().into_iter().collect()
}

fn first_sorted(re: &Regex, text: &str, limit: usize) -> Vec<String> {
    sorted_unique(re.find_iter(text).map(|m| m.as_str().to_string()))
        .into_iter()
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_email_and_phone_without_links() {
        let c = find_contacts("Jane Doe\njohn.doe@example.com\n+1 415 555 0100");
        assert_eq!(c.emails, ["john.doe@example.com"]);
        assert_eq!(c.phones, ["+1 415 555 0100"]);
        assert!(c.linkedin.is_empty());
        assert!(c.github.is_empty());
        assert!(c.portfolio.is_empty());
        assert!(!c.has_profile_link());
    }

    #[test]
    fn test_short_digit_runs_are_not_phones() {
        let c = find_contacts("Acme Corp 2019 - 2021\nRoom 1234 5678");
        assert!(c.phones.is_empty());
    }

    #[test]
    fn test_profiles_and_portfolio_separated() {
        let text = "linkedin.com/in/janedoe | https://github.com/janedoe | https://janedoe.dev/blog";
        let c = find_contacts(text);
        assert_eq!(c.linkedin, ["linkedin.com/in/janedoe"]);
        assert_eq!(c.github, ["https://github.com/janedoe"]);
        assert_eq!(c.portfolio, ["https://janedoe.dev/blog"]);
    }

    #[test]
    fn test_emails_sorted_and_deduplicated() {
        let c = find_contacts("b@example.org a@example.org b@example.org");
        assert_eq!(c.emails, ["a@example.org", "b@example.org"]);
    }

    #[test]
    fn test_phones_capped_at_three() {
        let text = "+1 415 555 0101\n+1 415 555 0102\n+1 415 555 0103\n+1 415 555 0104";
        assert_eq!(find_contacts(text).phones.len(), MAX_PHONES);
    }

    #[test]
    fn test_short_domains_not_portfolio() {
        assert!(find_contacts("see a.io").portfolio.is_empty());
    }

    proptest! {
        #[test]
        fn prop_contact_invariants(text in "[ -~\n]{0,400}") {
            let c = find_contacts(&text);
            for p in &c.phones {
                prop_assert!(p.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS);
            }
            prop_assert!(c.phones.len() <= MAX_PHONES);
            prop_assert!(c.portfolio.len() <= MAX_PORTFOLIO_LINKS);
            for u in &c.portfolio {
                let lu = u.to_lowercase();
                prop_assert!(!lu.contains("linkedin.com") && !lu.contains("github.com"));
            }
        }
    }
}
