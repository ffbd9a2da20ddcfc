use std::{
    collections::{hash_map::Entry, HashMap},
    path::{Path, PathBuf},
};

use crate::note::Note;

/// Maps a note name to its path relative to the vault root.
///
/// Names are not unique across folders. The first path registered for a name
/// wins and later ones are reported and dropped, so callers should register
/// notes in a stable order.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    paths: HashMap<String, PathBuf>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        let mut index = Self::new();
        for (name, rel_path) in entries {
            index.insert(name, rel_path);
        }
        index
    }

    pub fn from_notes(notes: &[Note]) -> Self {
        Self::build(
            notes
                .iter()
                .map(|note| (note.name.clone(), note.rel_path.clone())),
        )
    }

    /// Returns false if `name` was already taken.
    pub fn insert(&mut self, name: String, rel_path: PathBuf) -> bool {
        match self.paths.entry(name) {
            Entry::Occupied(existing) => {
                log::warn!(
                    "Duplicate note name {:?}: keeping {:?}, ignoring {:?}",
                    existing.key(),
                    existing.get(),
                    rel_path
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(rel_path);
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
