//! Error taxonomy for notestitch.
//!
//! Commands return `anyhow::Result`, but every failure the tool reports on
//! purpose is one of these variants, so callers can `downcast_ref` to tell
//! a busy directory apart from a malformed date or a missing template.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoteError {
    /// A create/copy/read/write/delete on the filesystem failed.
    #[error("Could not {action} `{}'", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token was not a `YYYY-MM-DD` calendar date.
    #[error("Date `{token}' is not a valid ISO 8601 date (YYYY-MM-DD)")]
    DateFormat { token: String },

    /// Another build holds the lock sentinel.
    #[error("Could not lock `{}'{}. Is another build running in this directory?", path.display(), holder.as_ref().map(|pid| format!(" (held by pid {})", pid)).unwrap_or_default())]
    LockHeld {
        path: PathBuf,
        holder: Option<String>,
    },

    /// The working directory has no `template.tex`.
    #[error("Could not find `{}' -- is this a notestitch subject directory?", path.display())]
    TemplateNotFound { path: PathBuf },

    /// The typesetter exited non-zero. Only ever reported as a warning.
    #[error("{program} returned {}; check {} for more information", code.map(|c| format!("exit status {}", c)).unwrap_or_else(|| "non-zero".to_string()), log.display())]
    Compiler {
        program: String,
        code: Option<i32>,
        log: PathBuf,
    },

    /// The build was interrupted while it held the lock.
    #[error("Build interrupted")]
    Interrupted,
}

impl NoteError {
    pub fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NoteError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}
