//! Build lock.
//!
//! A sentinel file in the subject directory gives cross-process mutual
//! exclusion between builds. Acquisition is a single atomic create-new: if
//! the file already exists the directory is busy and acquisition fails at
//! once, with no waiting and no retry. The [`BuildLock`] guard removes the
//! sentinel when dropped, so every return path out of a build releases it.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::error::NoteError;

/// Name of the lock sentinel inside a subject directory.
pub const LOCK_FILENAME: &str = ".notestitch.lock";

#[derive(Debug)]
pub struct BuildLock {
    path: PathBuf,
}

impl BuildLock {
    /// Try to take the lock for `root` without blocking.
    pub fn acquire(root: &Path) -> Result<BuildLock> {
        let path = root.join(LOCK_FILENAME);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = fs::read_to_string(&path)
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
                return Err(NoteError::LockHeld { path, holder }.into());
            }
            Err(e) => return Err(NoteError::fs("create", path, e).into()),
        };

        // From here on the guard owns the sentinel, even if the PID write fails.
        let lock = BuildLock { path };
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            tracing::debug!(error = %e, "could not record pid in lock file");
        }
        tracing::debug!(path = %lock.path.display(), "acquired build lock");
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BuildLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "released build lock"),
            Err(e) => eprintln!(
                "Warning: could not remove lock file `{}': {}",
                self.path.display(),
                e
            ),
        }
    }
}
