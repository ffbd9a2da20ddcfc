//! YAML frontmatter handling.
//!
//! Frontmatter is a YAML mapping at the very top of a note, between two
//! `---` lines. Notes are split into frontmatter and body, the body gets its
//! wikilinks rewritten, and both are joined again on output.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde_yaml::{Mapping, Value};

const DELIMITER: &str = "---";

pub const TITLE_KEY: &str = "title";
pub const PUBLISH_DATE_KEY: &str = "publishDate";

#[derive(Debug)]
pub struct Document<'a> {
    pub frontmatter: Mapping,
    pub body: &'a str,
}

/// Returns the YAML between the delimiters and the body after them, or
/// `None` if `content` has no complete frontmatter block.
fn split(content: &str) -> Option<(&str, &str)> {
    let (first_line, after_first_line) = content.split_once('\n')?;
    if first_line.trim_end() != DELIMITER {
        return None;
    }

    let (yaml, after_closing) = if let Some(rest) = after_first_line.strip_prefix(DELIMITER) {
        ("", rest)
    } else {
        let closing = after_first_line.find("\n---")?;
        (
            &after_first_line[..closing],
            &after_first_line[closing + 1 + DELIMITER.len()..],
        )
    };

    // The rest of the closing line belongs to the delimiter.
    let body = match after_closing.split_once('\n') {
        Some((_, body)) => body,
        None => "",
    };
    Some((yaml, body))
}

pub fn parse(content: &str) -> Result<Document<'_>> {
    let Some((yaml, body)) = split(content) else {
        return Ok(Document {
            frontmatter: Mapping::new(),
            body: content,
        });
    };

    let value: Value = serde_yaml::from_str(yaml).context("Invalid frontmatter YAML")?;
    let frontmatter = match value {
        Value::Null => Mapping::new(),
        Value::Mapping(mapping) => mapping,
        other => return Err(anyhow!("Frontmatter is not a mapping: {:?}", other)),
    };
    Ok(Document { frontmatter, body })
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(false, |f| f == 0.0 || f.is_nan()),
        _ => false,
    }
}

/// Fill in `title` and `publishDate` unless the note already sets them.
pub fn apply_defaults(frontmatter: &mut Mapping, title: &str, publish_date: NaiveDate) {
    if is_blank(frontmatter.get(TITLE_KEY)) {
        frontmatter.insert(TITLE_KEY.into(), title.into());
    }
    if is_blank(frontmatter.get(PUBLISH_DATE_KEY)) {
        frontmatter.insert(
            PUBLISH_DATE_KEY.into(),
            publish_date.format("%Y-%m-%d").to_string().into(),
        );
    }
}

pub fn stringify(frontmatter: &Mapping, body: &str) -> Result<String> {
    let mut out = String::new();
    if !frontmatter.is_empty() {
        let yaml = serde_yaml::to_string(frontmatter)?;
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(yaml.trim_end());
        out.push('\n');
        out.push_str(DELIMITER);
        out.push('\n');
    }
    out.push_str(body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
