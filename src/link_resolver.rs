//! Turns a parsed wikilink into a plain markdown link.

use crate::{
    converter::ConversionOptions, document_index::DocumentIndex, slug::slug,
    wikilink_parser::ParsedLink,
};

/// Builds the URL a wikilink points to, including the heading anchor.
///
/// Targets missing from the index still get a URL guessed from the slug of
/// their name, so a dangling wikilink never fails the conversion.
pub fn resolve_url(link: &ParsedLink, index: &DocumentIndex, options: &ConversionOptions) -> String {
    let base_url = options.base_url.trim_end_matches('/');

    let path = match index.get(&link.note_name) {
        Some(rel_path) if options.preserve_structure => {
            let rel_path = rel_path.to_string_lossy();
            let without_ext = rel_path.strip_suffix(".md").unwrap_or(&*rel_path);
            without_ext.replace('\\', "/")
        }
        Some(_) => slug(&link.note_name),
        None => {
            log::debug!("Unresolved wikilink target: {:?}", link.note_name);
            slug(&link.note_name)
        }
    };

    let mut url = format!("{base_url}/{path}");
    if let Some(heading) = link.heading.as_deref().filter(|h| !h.is_empty()) {
        url.push('#');
        url.push_str(&slug(heading));
    }
    url
}

/// Renders a wikilink as markdown. Embeds become a block-quoted "See" link
/// since the target format cannot inline another page.
pub fn resolve(link: &ParsedLink, index: &DocumentIndex, options: &ConversionOptions) -> String {
    let url = resolve_url(link, index, options);
    let display_text = link
        .alias
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(&link.note_name);

    if link.is_embed {
        format!("> [See: {display_text}]({url})")
    } else {
        format!("[{display_text}]({url})")
    }
}
