//! Subject directories.
//!
//! A subject directory holds a `template.tex` copied from the user template
//! plus the dated notes written into it over time.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;
use crate::error::NoteError;
use crate::locate::TEMPLATE_FILENAME;

/// Copy the user template into `dir` as `template.tex`, replacing any
/// template already there. Returns the path written.
pub fn init_subject(config: &Config, dir: &Path) -> Result<PathBuf> {
    let source = config.user_template();
    let target = dir.join(TEMPLATE_FILENAME);
    fs::copy(&source, &target).map_err(|e| NoteError::fs("copy template", &source, e))?;
    tracing::info!(from = %source.display(), to = %target.display(), "initialized subject");
    Ok(target)
}

/// Create a new subject directory and initialize it. The directory must not
/// exist yet.
pub fn new_subject(config: &Config, dir: &Path) -> Result<PathBuf> {
    fs::create_dir(dir).map_err(|e| NoteError::fs("create subject directory", dir, e))?;
    init_subject(config, dir)
}
