//! Converts a whole vault: discovers notes, indexes them, rewrites their
//! wikilinks and writes the results to the output directory.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::{
    document_index::DocumentIndex,
    frontmatter,
    note::{self, Note},
    rewriter,
};

/// Run-wide settings, fixed for the duration of a conversion.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Mirror the vault's folders in output paths and link URLs.
    pub preserve_structure: bool,
    /// Fill in `title` and `publishDate` frontmatter fields.
    pub frontmatter: bool,
    /// Do everything except writing files.
    pub dry_run: bool,
    /// Prefix for every generated link URL, e.g. `/blog`.
    pub base_url: String,
}

#[derive(Debug, Default)]
pub struct ConversionResult {
    pub processed_files: usize,
    pub converted_links: usize,
    pub errors: Vec<String>,
}

pub struct Converter {
    input_path: PathBuf,
    output_path: PathBuf,
    options: ConversionOptions,
}

impl Converter {
    pub fn new(input_path: PathBuf, output_path: PathBuf, options: ConversionOptions) -> Self {
        Self {
            input_path,
            output_path,
            options,
        }
    }

    /// Convert every note in the input directory.
    ///
    /// Fails without touching anything if the input directory is unusable.
    /// Failures of individual notes are collected in the result instead.
    pub fn convert(&self) -> Result<ConversionResult> {
        let mut result = ConversionResult::default();

        if !self.input_path.exists() {
            return Err(anyhow!(
                "Input directory does not exist: {}",
                self.input_path.display()
            ));
        }
        if !self.input_path.is_dir() {
            return Err(anyhow!(
                "Input path is not a directory: {}",
                self.input_path.display()
            ));
        }

        if !self.options.dry_run {
            fs::create_dir_all(&self.output_path).with_context(|| {
                format!("Failed to create {}", self.output_path.display())
            })?;
        }

        let notes = note::find_notes(&self.input_path)?;
        if notes.is_empty() {
            log::warn!("No markdown files found in {}", self.input_path.display());
            return Ok(result);
        }
        log::info!("Found {} markdown files to process", notes.len());

        // Every note must be known before the first link is resolved.
        let index = DocumentIndex::from_notes(&notes);
        log::debug!("Indexed {} note names", index.len());
        self.warn_about_flattened_collisions(&notes);

        for note in &notes {
            match self.process_note(note, &index) {
                Ok(link_count) => {
                    result.processed_files += 1;
                    result.converted_links += link_count;
                }
                Err(e) => {
                    log::error!("Error processing {}: {:#}", note.absolute_path.display(), e);
                    result.errors.push(format!(
                        "Error processing {}: {:#}",
                        note.absolute_path.display(),
                        e
                    ));
                }
            }
        }

        Ok(result)
    }

    /// Rewrite one note and write it out. Returns the number of converted links.
    fn process_note(&self, note: &Note, index: &DocumentIndex) -> Result<usize> {
        let content = fs::read_to_string(&note.absolute_path)
            .with_context(|| format!("Failed to read {}", note.absolute_path.display()))?;
        let document = frontmatter::parse(&content)?;

        let rewritten = rewriter::rewrite(document.body, index, &self.options);

        let mut fields = document.frontmatter;
        if self.options.frontmatter {
            let modified = fs::metadata(&note.absolute_path)?.modified()?;
            let publish_date = DateTime::<Utc>::from(modified).date_naive();
            frontmatter::apply_defaults(&mut fields, &note.name, publish_date);
        }
        let output = frontmatter::stringify(&fields, &rewritten.content)?;

        let output_file = self.output_file(note);
        if !self.options.dry_run {
            if let Some(parent) = output_file.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&output_file, output)
                .with_context(|| format!("Failed to write {}", output_file.display()))?;
        }

        log::info!(
            "{}Processed: {} -> {}",
            if self.options.dry_run { "[DRY RUN] " } else { "" },
            note.rel_path.display(),
            output_file
                .strip_prefix(&self.output_path)
                .unwrap_or(&output_file)
                .display()
        );
        Ok(rewritten.link_count)
    }

    fn output_file(&self, note: &Note) -> PathBuf {
        if self.options.preserve_structure {
            self.output_path.join(&note.rel_path)
        } else {
            match note.rel_path.file_name() {
                Some(file_name) => self.output_path.join(file_name),
                None => self.output_path.join(&note.rel_path),
            }
        }
    }

    /// Flattening can map notes from different folders onto one output file,
    /// in which case the last one processed is the one that survives.
    fn warn_about_flattened_collisions(&self, notes: &[Note]) {
        if self.options.preserve_structure {
            return;
        }
        let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
        for note in notes {
            let output_file = self.output_file(note);
            if let Some(previous) = seen.insert(output_file.clone(), &note.rel_path) {
                log::warn!(
                    "{} and {} both flatten to {}",
                    previous.display(),
                    note.rel_path.display(),
                    output_file.display()
                );
            }
        }
    }
}

pub fn convert(
    input_path: PathBuf,
    output_path: PathBuf,
    options: ConversionOptions,
) -> Result<ConversionResult> {
    Converter::new(input_path, output_path, options).convert()
}
