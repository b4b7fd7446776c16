//! Document compilation.
//!
//! The rendered document is handed to an external typesetter (`pdflatex`
//! by default). The tool only observes the exit status: a failed compile is
//! the user's LaTeX problem, reported as a warning, not an error of ours.

use std::path::Path;
use std::process::Stdio;

use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;

use crate::config::CompilerConfig;
use crate::error::NoteError;

/// Exit status of a compiler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileStatus {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CompileStatus {
    pub fn ok() -> Self {
        CompileStatus {
            success: true,
            code: Some(0),
        }
    }

    pub fn failed(code: Option<i32>) -> Self {
        CompileStatus {
            success: false,
            code,
        }
    }
}

/// Turns a rendered document into a PDF.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Program name used in messages.
    fn name(&self) -> &str;

    /// Compile `input` (a filename relative to `workdir`).
    ///
    /// `Err` means the compiler could not be run at all.
    async fn compile(&self, workdir: &Path, input: &Path) -> Result<CompileStatus>;
}

/// Runs a typesetter as a subprocess with stdin and stdout suppressed.
/// Stderr is inherited so diagnostics reach the user.
pub struct ProcessCompiler {
    program: String,
    args: Vec<String>,
}

impl ProcessCompiler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        ProcessCompiler {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        ProcessCompiler::new(config.program.clone(), config.args.clone())
    }
}

#[async_trait]
impl Compiler for ProcessCompiler {
    fn name(&self) -> &str {
        &self.program
    }

    async fn compile(&self, workdir: &Path, input: &Path) -> Result<CompileStatus> {
        tracing::info!(program = %self.program, input = %input.display(), "running compiler");

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| NoteError::fs("run", &self.program, e))?;

        tracing::debug!(?status, "compiler exited");
        Ok(if status.success() {
            CompileStatus::ok()
        } else {
            CompileStatus::failed(status.code())
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_success_status() {
        let tmp = TempDir::new().unwrap();
        let compiler = ProcessCompiler::new("true", vec![]);
        let status = compiler.compile(tmp.path(), Path::new("notes.tex")).await.unwrap();
        assert_eq!(status, CompileStatus::ok());
    }

    #[tokio::test]
    async fn test_failure_status() {
        let tmp = TempDir::new().unwrap();
        let compiler = ProcessCompiler::new("false", vec![]);
        let status = compiler.compile(tmp.path(), Path::new("notes.tex")).await.unwrap();
        assert!(!status.success);
        assert_eq!(status.code, Some(1));
    }

    #[tokio::test]
    async fn test_runs_in_workdir_with_args() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("notes.tex"), "x").unwrap();
        let compiler = ProcessCompiler::new("sh", vec!["-c".to_string(), "cp \"$0\" out.pdf".to_string()]);
        let status = compiler.compile(tmp.path(), Path::new("notes.tex")).await.unwrap();
        assert!(status.success);
        assert!(tmp.path().join("out.pdf").exists());
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let compiler = ProcessCompiler::new("notestitch-no-such-typesetter", vec![]);
        let err = compiler.compile(tmp.path(), Path::new("notes.tex")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NoteError>(),
            Some(NoteError::Filesystem { action: "run", .. })
        ));
    }
}
