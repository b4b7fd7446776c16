//! Note dates.
//!
//! Notes are keyed by calendar date through their filename: `YYYY-MM-DD.tex`.
//! Parsing is strict about shape (four-digit year, two-digit month and day,
//! `-` separators) so that formatting a parsed date always reproduces the
//! token it came from. Calendar validity (month 13, February 30) is left to
//! `chrono`.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::NoteError;

/// `strftime` format of a note date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Extension carried by every note file.
pub const NOTE_EXTENSION: &str = ".tex";

/// A calendar date at day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteDate(NaiveDate);

impl NoteDate {
    pub fn new(date: NaiveDate) -> Self {
        NoteDate(date)
    }

    /// Today's date in local time.
    pub fn today() -> Self {
        NoteDate(chrono::Local::now().date_naive())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Filename of the note for this date, e.g. `2024-01-09.tex`.
    pub fn note_filename(&self) -> String {
        format!("{}{}", self, NOTE_EXTENSION)
    }
}

impl fmt::Display for NoteDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for NoteDate {
    type Err = NoteError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let malformed = || NoteError::DateFormat {
            token: token.to_string(),
        };

        let bytes = token.as_bytes();
        if bytes.len() != 10 {
            return Err(malformed());
        }
        let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
        if !shape_ok {
            return Err(malformed());
        }

        NaiveDate::parse_from_str(token, DATE_FORMAT)
            .map(NoteDate)
            .map_err(|_| malformed())
    }
}

impl Serialize for NoteDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a bare `YYYY-MM-DD` token.
pub fn parse_date(token: &str) -> Result<NoteDate> {
    Ok(token.parse::<NoteDate>()?)
}

/// Parse a note filename of the form `YYYY-MM-DD.tex`.
///
/// Returns `None` for anything else; the directory may hold unrelated
/// `.tex` files and those are not notes.
pub fn parse_note_filename(name: &str) -> Option<NoteDate> {
    name.strip_suffix(NOTE_EXTENSION)?.parse().ok()
}

/// Normalize a date token given on the command line.
///
/// The token may carry the note extension or not. Returns the parsed date
/// together with the note filename it names.
pub fn parse_date_token(token: &str) -> Result<(NoteDate, String)> {
    let filename = if token.ends_with(NOTE_EXTENSION) {
        token.to_string()
    } else {
        format!("{}{}", token, NOTE_EXTENSION)
    };
    let bare = token.strip_suffix(NOTE_EXTENSION).unwrap_or(token);
    let date = bare.parse::<NoteDate>()?;
    Ok((date, filename))
}

/// An inclusive date range. No ordering check is made: an inverted range
/// simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub lower: NoteDate,
    pub upper: NoteDate,
}

impl DateRange {
    pub fn new(lower: NoteDate, upper: NoteDate) -> Self {
        DateRange { lower, upper }
    }

    pub fn parse(lower: &str, upper: &str) -> Result<Self> {
        Ok(DateRange::new(parse_date(lower)?, parse_date(upper)?))
    }

    pub fn contains(&self, date: NoteDate) -> bool {
        self.lower <= date && date <= self.upper
    }
}
