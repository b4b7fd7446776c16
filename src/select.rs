//! Note selection.
//!
//! Narrows the discovered notes by an optional inclusive date range, then
//! appends the explicitly requested dates in the order they were given.
//! Requested dates are not deduplicated and the result is not sorted.

use std::path::Path;

use anyhow::Result;

use crate::date::{parse_date_token, DateRange, NoteDate};
use crate::models::NoteFile;

/// An explicitly requested note, already validated as a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedNote {
    pub date: NoteDate,
    pub filename: String,
}

/// Validate explicit date tokens. Any malformed token fails the whole list.
pub fn parse_requested(tokens: &[String]) -> Result<Vec<RequestedNote>> {
    tokens
        .iter()
        .map(|token| {
            let (date, filename) = parse_date_token(token)?;
            Ok(RequestedNote { date, filename })
        })
        .collect()
}

/// Outcome of selection.
#[derive(Debug, Default)]
pub struct Selection {
    pub notes: Vec<NoteFile>,
    /// Requested filenames that do not exist in the subject directory.
    pub missing: Vec<String>,
}

pub fn select_notes(
    root: &Path,
    discovered: Vec<NoteFile>,
    range: Option<&DateRange>,
    requested: &[RequestedNote],
) -> Selection {
    let mut notes: Vec<NoteFile> = match range {
        Some(range) => discovered
            .into_iter()
            .filter(|note| range.contains(note.date))
            .collect(),
        None => discovered,
    };

    let mut missing = Vec::new();
    for request in requested {
        if root.join(&request.filename).exists() {
            notes.push(NoteFile::new(request.date, &request.filename));
        } else {
            missing.push(request.filename.clone());
        }
    }

    Selection { notes, missing }
}
