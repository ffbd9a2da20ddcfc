use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub const NOTE_EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct Note {
    pub rel_path: PathBuf,
    pub absolute_path: PathBuf,
    /// The name wikilinks use to refer to this note, i.e. the file name
    /// without its extension.
    pub name: String,
}

impl Note {
    pub fn new(vault_root_path: &Path, rel_path: &Path) -> Self {
        Self {
            rel_path: rel_path.to_path_buf(),
            absolute_path: vault_root_path.join(rel_path),
            name: note_name_from_relative_path(rel_path),
        }
    }
}

fn note_name_from_relative_path(rel_path: &Path) -> String {
    let name = match rel_path.extension() {
        Some(ext) if ext == NOTE_EXTENSION => rel_path.file_stem(),
        _ => rel_path.file_name(),
    };
    name.map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns true if no component of `rel_path` starts with a dot.
pub fn file_has_no_hidden_component(rel_path: &Path) -> bool {
    rel_path
        .components()
        .all(|component| !component.as_os_str().to_string_lossy().starts_with('.'))
}

fn is_note_file(rel_path: &Path) -> bool {
    rel_path
        .extension()
        .map_or(false, |ext| ext == NOTE_EXTENSION)
}

/// Recursively walk the vault directory and collect every markdown note,
/// sorted by path.
pub fn find_notes(vault_root_path: &Path) -> anyhow::Result<Vec<Note>> {
    let mut notes = Vec::new();
    for entry in WalkDir::new(vault_root_path).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel_path = entry.path().strip_prefix(vault_root_path)?;
        if is_note_file(rel_path) && file_has_no_hidden_component(rel_path) {
            notes.push(Note::new(vault_root_path, rel_path));
        }
    }
    log::debug!("Found {} notes in {:?}", notes.len(), vault_root_path);
    Ok(notes)
}
