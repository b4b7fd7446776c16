//! Today's note.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::date::NoteDate;
use crate::error::NoteError;

/// Make sure the note for `date` exists in `dir` without touching any
/// content it already has. Returns its path.
pub fn touch_note(dir: &Path, date: NoteDate) -> Result<PathBuf> {
    let path = dir.join(date.note_filename());
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| NoteError::fs("create note", &path, e))?;
    Ok(path)
}
