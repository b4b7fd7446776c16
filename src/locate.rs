//! Note discovery.
//!
//! Scans the top level of a subject directory for `*.tex` files, skips the
//! template, and keeps every file whose name is a `YYYY-MM-DD` date. Order
//! is whatever the filesystem yields; nothing is sorted.

use std::path::Path;

use anyhow::Result;
use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

use crate::date::{parse_note_filename, NOTE_EXTENSION};
use crate::error::NoteError;
use crate::models::NoteFile;

/// Name of the per-subject template.
pub const TEMPLATE_FILENAME: &str = "template.tex";

/// Result of a directory scan.
#[derive(Debug, Default)]
pub struct Discovery {
    pub notes: Vec<NoteFile>,
    /// `.tex` files that were not the template and not dated.
    pub skipped: Vec<String>,
}

pub fn discover_notes(root: &Path) -> Result<Discovery> {
    let matcher = note_glob()?;
    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root).min_depth(1).max_depth(1);
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory loop"));
            NoteError::fs("read directory", path, source)
        })?;
        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !matcher.is_match(&name) || name == TEMPLATE_FILENAME {
            continue;
        }

        match parse_note_filename(&name) {
            Some(date) => discovery.notes.push(NoteFile::new(date, name)),
            None => {
                tracing::debug!(file = %name, "not a dated note");
                discovery.skipped.push(name);
            }
        }
    }

    Ok(discovery)
}

fn note_glob() -> Result<GlobMatcher> {
    Ok(Glob::new(&format!("*{}", NOTE_EXTENSION))?.compile_matcher())
}
