//! Finds wikilinks in raw text and splits them into their parts.
//! A wikilink looks like `[[target]]`, optionally prefixed with `!` to embed
//! the target, and its body may carry a heading (`#`), a block reference (`^`)
//! and an alias (`|`): `![[Note#Heading^block|Shown text]]`.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

const ALIAS_SEPARATOR: char = '|';
const BLOCK_SEPARATOR: char = '^';
const HEADING_SEPARATOR: char = '#';

// Create a regex to match the wikilink and capture its embed marker and body.
pub static WIKILINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(!?)\[\[([^\]]+)\]\]").expect("Failed to compile WIKILINK_RE regex."));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    /// The matched text, including the embed marker and the brackets.
    pub original: String,
    /// Byte offsets of `original` within the scanned text.
    pub span: Range<usize>,
    pub note_name: String,
    pub alias: Option<String>,
    pub heading: Option<String>,
    /// Parsed but never rendered, the output format has no block anchors.
    pub block_ref: Option<String>,
    pub is_embed: bool,
}

/// Scan `text` once and return every wikilink in it, left to right.
pub fn scan(text: &str) -> Vec<ParsedLink> {
    WIKILINK_RE
        .captures_iter(text)
        .filter_map(|captures| {
            let full = captures.get(0)?;
            let body = captures.get(2)?.as_str();
            let is_embed = captures.get(1).map_or(false, |m| m.as_str() == "!");
            Some(parse_body(full.as_str(), full.range(), body, is_embed))
        })
        .collect()
}

/// Splits `text` at the first `separator`, trimming the part after it.
fn split_off(text: &str, separator: char) -> (&str, Option<String>) {
    match text.split_once(separator) {
        Some((before, after)) => (before, Some(after.trim().to_owned())),
        None => (text, None),
    }
}

fn parse_body(original: &str, span: Range<usize>, body: &str, is_embed: bool) -> ParsedLink {
    // Each split works on what the previous one left over, so an alias may
    // contain `#` or `^` without being reinterpreted.
    let (rest, alias) = split_off(body, ALIAS_SEPARATOR);
    let (rest, block_ref) = split_off(rest, BLOCK_SEPARATOR);
    let (rest, heading) = split_off(rest, HEADING_SEPARATOR);

    ParsedLink {
        original: original.to_owned(),
        span,
        note_name: rest.trim().to_owned(),
        alias,
        heading,
        block_ref,
        is_embed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single(text: &str) -> ParsedLink {
        let links = scan(text);
        assert_eq!(links.len(), 1, "expected exactly one link in {text:?}");
        links.into_iter().next().unwrap()
    }

    #[test]
    fn parses_simple_link() {
        let link = single("This is a [[simple link]] in text.");
        assert_eq!(
            link,
            ParsedLink {
                original: "[[simple link]]".to_owned(),
                span: 10..25,
                note_name: "simple link".to_owned(),
                alias: None,
                heading: None,
                block_ref: None,
                is_embed: false,
            }
        );
    }

    #[test]
    fn parses_bare_link() {
        let link = single("[[A]]");
        assert_eq!(link.original, "[[A]]");
        assert_eq!(link.note_name, "A");
        assert_eq!(link.alias, None);
        assert_eq!(link.heading, None);
        assert_eq!(link.block_ref, None);
        assert!(!link.is_embed);
    }

    #[test]
    fn parses_embed() {
        let link = single("Here is an embedded note: ![[Embedded Note]]");
        assert!(link.is_embed);
        assert_eq!(link.original, "![[Embedded Note]]");
        assert_eq!(link.note_name, "Embedded Note");
    }

    #[test]
    fn parses_alias() {
        let link = single("Check out [[Long Note Name|Short Alias]].");
        assert_eq!(link.note_name, "Long Note Name");
        assert_eq!(link.alias.as_deref(), Some("Short Alias"));
    }

    #[test]
    fn parses_heading() {
        let link = single("See [[Note#Section Heading]] for details.");
        assert_eq!(link.note_name, "Note");
        assert_eq!(link.heading.as_deref(), Some("Section Heading"));
    }

    #[test]
    fn parses_block_ref() {
        let link = single("[[A^B]]");
        assert_eq!(link.note_name, "A");
        assert_eq!(link.block_ref.as_deref(), Some("B"));
        assert_eq!(link.heading, None);
    }

    #[test]
    fn block_split_happens_before_heading_split() {
        let link = single("[[A#B^C]]");
        assert_eq!(link.note_name, "A");
        assert_eq!(link.heading.as_deref(), Some("B"));
        assert_eq!(link.block_ref.as_deref(), Some("C"));
    }

    #[test]
    fn alias_takes_priority_over_other_separators() {
        let link = single("[[Note|see #3 and ^x]]");
        assert_eq!(link.note_name, "Note");
        assert_eq!(link.alias.as_deref(), Some("see #3 and ^x"));
        assert_eq!(link.heading, None);
        assert_eq!(link.block_ref, None);
    }

    #[test]
    fn trims_every_part() {
        let link = single("[[  Note  # Intro  ^ id |  Shown  ]]");
        assert_eq!(link.note_name, "Note");
        assert_eq!(link.heading.as_deref(), Some("Intro"));
        assert_eq!(link.block_ref.as_deref(), Some("id"));
        assert_eq!(link.alias.as_deref(), Some("Shown"));
    }

    #[test]
    fn parses_multiple_links_in_order() {
        let links = scan("Link to [[Note 1]] and [[Note 2|Alias]] and ![[Embedded]].");
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].note_name, "Note 1");
        assert_eq!(links[1].note_name, "Note 2");
        assert_eq!(links[1].alias.as_deref(), Some("Alias"));
        assert_eq!(links[2].note_name, "Embedded");
        assert!(links[2].is_embed);
    }

    #[test]
    fn ignores_malformed_brackets() {
        assert!(scan("[[unterminated").is_empty());
        assert!(scan("[[]]").is_empty());
        assert!(scan("[single]").is_empty());
        assert!(scan("[[half]").is_empty());
    }

    #[test]
    fn spans_point_at_the_original_text() {
        let text = "a [[X]] b ![[Y|y]] c [[X]]";
        for link in scan(text) {
            assert_eq!(&text[link.span.clone()], link.original);
        }
    }

    proptest! {
        #[test]
        fn note_names_never_contain_separators(text in r"[a-z |#^!\[\]]{0,40}") {
            for link in scan(&text) {
                prop_assert!(!link.note_name.contains(['|', '^', '#']));
                prop_assert_eq!(&text[link.span.clone()], link.original.as_str());
            }
        }
    }
}
