use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::collapse_whitespace;

const NAME_SCAN_LINES: usize = 16;
const MAX_NAME_LINE_CHARS: usize = 50;
const NOT_A_NAME: &[&str] = &["curriculum vitae", "resume", "cv"];

static NAME_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-zÀ-ÖØ-öø-ÿ]+").expect("valid regex"));

/// Picks the first early line that looks like a personal name: two to four
/// alphabetic words, no digits, no `@`, not a document title.
pub fn guess_name<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    lines
        .iter()
        .take(NAME_SCAN_LINES)
        .map(AsRef::as_ref)
        .find(|line| is_name_like(line))
        .map(collapse_whitespace)
}

fn is_name_like(line: &str) -> bool {
    let lowered = line.to_lowercase();
    let bare = lowered.trim_matches(&[':', '-', '•', '*', ' '][..]).trim();
    if NOT_A_NAME.iter().any(|phrase| bare.contains(phrase)) {
        return false;
    }
    if line.contains('@') || line.chars().any(char::is_numeric) {
        return false;
    }
    if line.chars().count() > MAX_NAME_LINE_CHARS {
        return false;
    }
    (2..=4).contains(&NAME_WORD.find_iter(line).count())
}
