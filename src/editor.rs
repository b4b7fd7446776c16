//! Launching the user's editor.

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Result};

use crate::error::NoteError;

#[cfg(windows)]
const FALLBACK_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const FALLBACK_EDITOR: &str = "vi";

/// Pick the editor command: explicit flag, then config, then `$VISUAL`,
/// then `$EDITOR`, then the platform fallback.
pub fn resolve_editor(flag: Option<&str>, configured: Option<&str>) -> String {
    let from_env = |var: &str| std::env::var(var).ok().filter(|v| !v.trim().is_empty());
    flag.map(str::to_string)
        .or_else(|| configured.map(str::to_string))
        .or_else(|| from_env("VISUAL"))
        .or_else(|| from_env("EDITOR"))
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Open `path` in `editor` and wait for it to exit. The editor string may
/// carry its own arguments, e.g. `code --wait`.
pub fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = match parts.next() {
        Some(p) => p,
        None => bail!("No editor configured"),
    };

    tracing::debug!(editor, path = %path.display(), "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| NoteError::fs("launch editor", program, e))?;

    if !status.success() {
        bail!("Editor `{}' exited with {}", editor, status);
    }
    Ok(())
}
