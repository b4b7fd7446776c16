//! The build pipeline.
//!
//! `notestitch build` selects notes, renders them into the subject's
//! `template.tex`, writes the result to `notes.tex` and runs the compiler
//! on it to get `notes.pdf`.
//!
//! ```text
//! Idle ─▶ LockAcquiring ─┬─▶ LockFailed                       (error)
//!                        └─▶ Locked ─▶ RenderingTemplate ─┬─▶ TemplateMissing (error)
//!                                                          └─▶ Rendered ─▶ Compiling ─▶ Cleanup ─▶ Done
//! ```
//!
//! The lock is held by a guard for the whole run, so it is released on
//! every exit path once acquired, Ctrl-C included. A failing compiler is a
//! warning; the build itself still succeeds.

use std::fs;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::compile::{CompileStatus, Compiler};
use crate::date::DateRange;
use crate::error::NoteError;
use crate::locate::{discover_notes, TEMPLATE_FILENAME};
use crate::lock::BuildLock;
use crate::models::{Note, NoteFile};
use crate::render::Renderer;
use crate::select::{parse_requested, select_notes, RequestedNote};

/// Intermediate document handed to the compiler; removed after each build.
pub const RENDERED_FILENAME: &str = "notes.tex";
/// Compiler log the user is pointed at when compilation fails.
pub const LOG_FILENAME: &str = "notes.log";
pub const PDF_FILENAME: &str = "notes.pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Idle,
    LockAcquiring,
    LockFailed,
    Locked,
    RenderingTemplate,
    TemplateMissing,
    Rendered,
    Compiling,
    Cleanup,
    Done,
}

/// What to build: an optional inclusive range over the discovered notes
/// plus explicitly requested dates, in the order given.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub range: Option<DateRange>,
    pub requested: Vec<RequestedNote>,
}

impl BuildRequest {
    /// Validate command-line tokens. Any malformed date rejects the request.
    pub fn parse(range: Option<(&str, &str)>, dates: &[String]) -> Result<Self> {
        let range = match range {
            Some((lower, upper)) => Some(DateRange::parse(lower, upper)?),
            None => None,
        };
        Ok(BuildRequest {
            range,
            requested: parse_requested(dates)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of notes rendered; zero means there was nothing to build.
    pub notes: usize,
    /// `None` when the compiler never ran.
    pub compiler: Option<CompileStatus>,
    /// Non-fatal problems, in the order they were reported.
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn is_empty(&self) -> bool {
        self.notes == 0
    }

    fn warn(&mut self, message: String) {
        eprintln!("Warning: {}", message);
        self.warnings.push(message);
    }
}

pub struct Builder<'a> {
    root: PathBuf,
    renderer: &'a dyn Renderer,
    compiler: &'a dyn Compiler,
    stage: BuildStage,
}

impl<'a> Builder<'a> {
    pub fn new(root: &Path, renderer: &'a dyn Renderer, compiler: &'a dyn Compiler) -> Self {
        Builder {
            root: root.to_path_buf(),
            renderer,
            compiler,
            stage: BuildStage::Idle,
        }
    }

    /// Last stage the pipeline reached.
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    fn enter(&mut self, stage: BuildStage) {
        tracing::debug!(from = ?self.stage, to = ?stage, "build stage");
        self.stage = stage;
    }

    /// Run the build, abandoning it on Ctrl-C.
    pub async fn run(&mut self, request: &BuildRequest) -> Result<BuildReport> {
        let interrupt = async {
            // Without a signal handler the build just runs to completion.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        self.run_until(request, interrupt).await
    }

    /// Run the build, abandoning it as soon as `interrupt` completes.
    ///
    /// Everything after the lock is taken races against `interrupt`. An
    /// interrupted build removes `notes.tex` if it was written, kills a
    /// running compiler and still releases the lock.
    pub async fn run_until<F>(&mut self, request: &BuildRequest, interrupt: F) -> Result<BuildReport>
    where
        F: Future<Output = ()>,
    {
        self.enter(BuildStage::LockAcquiring);
        let _lock = match BuildLock::acquire(&self.root) {
            Ok(lock) => lock,
            Err(e) => {
                self.enter(BuildStage::LockFailed);
                return Err(e);
            }
        };
        self.enter(BuildStage::Locked);

        let finished = tokio::select! {
            // Polled first, so the handler is in place before any work starts.
            biased;
            () = interrupt => None,
            result = self.run_locked(request) => Some(result),
        };

        match finished {
            Some(result) => result,
            None => {
                tracing::info!(stage = ?self.stage, "build interrupted");
                if matches!(self.stage, BuildStage::Rendered | BuildStage::Compiling) {
                    let output = self.root.join(RENDERED_FILENAME);
                    if let Err(e) = fs::remove_file(&output) {
                        eprintln!("Warning: Could not unlink `{}': {}", RENDERED_FILENAME, e);
                    }
                }
                Err(NoteError::Interrupted.into())
            }
        }
    }

    async fn run_locked(&mut self, request: &BuildRequest) -> Result<BuildReport> {
        let mut report = BuildReport::default();

        let discovery = discover_notes(&self.root)?;
        for name in &discovery.skipped {
            report.warn(format!(
                "File `{}' was skipped as the filename is not an ISO 8601 date",
                name
            ));
        }

        let selection = select_notes(
            &self.root,
            discovery.notes,
            request.range.as_ref(),
            &request.requested,
        );
        for name in &selection.missing {
            report.warn(format!("File `{}' does not exist; skipping.", name));
        }

        if selection.notes.is_empty() {
            self.enter(BuildStage::Done);
            return Ok(report);
        }

        // Give a pending interrupt the chance to win between stages.
        tokio::task::yield_now().await;
        let notes = self.read_notes(&selection.notes)?;

        self.enter(BuildStage::RenderingTemplate);
        let template = self.read_template()?;
        let rendered = self.renderer.render(&template, &notes)?;
        tokio::task::yield_now().await;

        let output = self.root.join(RENDERED_FILENAME);
        fs::write(&output, rendered).map_err(|e| NoteError::fs("write to", &output, e))?;
        self.enter(BuildStage::Rendered);
        report.notes = notes.len();

        self.enter(BuildStage::Compiling);
        let compiled = self
            .compiler
            .compile(&self.root, Path::new(RENDERED_FILENAME))
            .await;

        self.enter(BuildStage::Cleanup);
        if let Err(e) = fs::remove_file(&output) {
            report.warn(format!("Could not unlink `{}': {}", RENDERED_FILENAME, e));
        }

        let status = compiled?;
        if !status.success {
            report.warn(
                NoteError::Compiler {
                    program: self.compiler.name().to_string(),
                    code: status.code,
                    log: PathBuf::from(LOG_FILENAME),
                }
                .to_string(),
            );
        }
        report.compiler = Some(status);

        self.enter(BuildStage::Done);
        Ok(report)
    }

    /// Read every selected note in full. One unreadable file aborts the build.
    fn read_notes(&self, files: &[NoteFile]) -> Result<Vec<Note>> {
        files
            .iter()
            .map(|file| {
                let path = self.root.join(&file.filename);
                let content =
                    fs::read_to_string(&path).map_err(|e| NoteError::fs("open", &file.filename, e))?;
                Ok(Note::from_file(file, content))
            })
            .collect()
    }

    fn read_template(&mut self) -> Result<String> {
        let path = self.root.join(TEMPLATE_FILENAME);
        match fs::read_to_string(&path) {
            Ok(source) => Ok(source),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.enter(BuildStage::TemplateMissing);
                Err(NoteError::TemplateNotFound {
                    path: PathBuf::from(TEMPLATE_FILENAME),
                }
                .into())
            }
            Err(e) => Err(NoteError::fs("read", path, e).into()),
        }
    }
}

/// Run one build in `root`.
pub async fn run_build(
    root: &Path,
    request: &BuildRequest,
    renderer: &dyn Renderer,
    compiler: &dyn Compiler,
) -> Result<BuildReport> {
    Builder::new(root, renderer, compiler).run(request).await
}
