//! Turns arbitrary text into a lowercase, hyphen-separated, URL-safe slug.
//! The same transform produces file slugs and heading anchors, so anchors
//! always agree with the slugs of the pages they point into.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").expect("Failed to compile DISALLOWED_RE regex."));
static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE regex."));
static HYPHENS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-+").expect("Failed to compile HYPHENS_RE regex."));

pub fn slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let allowed = DISALLOWED_RE.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RE.replace_all(&allowed, "-");
    let collapsed = HYPHENS_RE.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_owned()
}
