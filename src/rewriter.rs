use crate::{
    converter::ConversionOptions, document_index::DocumentIndex, link_resolver,
    wikilink_parser,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    pub link_count: usize,
}

/// Replace every wikilink in `text` with its markdown rendering.
///
/// Substitution goes by the byte span of each match, so repeated identical
/// wikilinks are each converted exactly once.
pub fn rewrite(text: &str, index: &DocumentIndex, options: &ConversionOptions) -> Rewritten {
    let links = wikilink_parser::scan(text);
    let mut content = String::with_capacity(text.len());
    let mut cursor = 0;

    for link in &links {
        content.push_str(&text[cursor..link.span.start]);
        content.push_str(&link_resolver::resolve(link, index, options));
        cursor = link.span.end;
    }
    content.push_str(&text[cursor..]);

    Rewritten {
        content,
        link_count: links.len(),
    }
}
