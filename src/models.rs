//! Core data types that flow through the build pipeline.
//!
//! A [`NoteFile`] is what discovery and selection produce: a date and the
//! file that holds it. Reading the file turns it into a [`Note`], which is
//! what the template sees.

use std::path::PathBuf;

use serde::Serialize;

use crate::date::NoteDate;

/// A selected note whose content has not been read yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    pub date: NoteDate,
    /// Path relative to the subject directory, e.g. `2024-01-09.tex`.
    pub filename: PathBuf,
}

impl NoteFile {
    pub fn new(date: NoteDate, filename: impl Into<PathBuf>) -> Self {
        NoteFile {
            date,
            filename: filename.into(),
        }
    }
}

/// A note with its full text. Never mutated after it is read.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub date: NoteDate,
    pub filename: String,
    pub content: String,
}

impl Note {
    pub fn from_file(file: &NoteFile, content: String) -> Self {
        Note {
            date: file.date,
            filename: file.filename.to_string_lossy().to_string(),
            content,
        }
    }
}
