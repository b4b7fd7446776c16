//! # notestitch CLI
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `notestitch init [--edit]` | Copy the user template into the current directory |
//! | `notestitch new <SUBJECT> [--edit]` | Create a subject directory and initialize it |
//! | `notestitch note [--editor EDITOR]` | Open (creating if needed) today's `YYYY-MM-DD.tex` |
//! | `notestitch build [--date-range START END] [DATE...]` | Render notes and run the compiler |
//!
//! ## Examples
//!
//! ```bash
//! # Everything in the current subject
//! notestitch build
//!
//! # January only, plus one note from December
//! notestitch build --date-range 2024-01-01 2024-01-31 2023-12-18
//!
//! # Use a scratch configuration directory
//! NOTESTITCH_CONFIG_DIR=/tmp/ns notestitch init
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use notestitch::build::{run_build, BuildRequest, PDF_FILENAME};
use notestitch::compile::ProcessCompiler;
use notestitch::config::Config;
use notestitch::date::NoteDate;
use notestitch::editor::{open_in_editor, resolve_editor};
use notestitch::note::touch_note;
use notestitch::render::JinjaRenderer;
use notestitch::subject::{init_subject, new_subject};

/// Stitch together individual note files with templates.
#[derive(Parser)]
#[command(
    name = "notestitch",
    version,
    about = "Stitch together individual note files with templates",
    long_about = "notestitch collects dated note files (YYYY-MM-DD.tex) from a subject directory, \
    renders them through the subject's template.tex and builds a PDF with pdflatex."
)]
struct Cli {
    /// User configuration directory holding `template.tex` and `config.toml`.
    ///
    /// Defaults to the platform configuration directory, e.g.
    /// `~/.config/notestitch` on Linux.
    #[arg(long, global = true, env = "NOTESTITCH_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a subject in the current directory.
    ///
    /// Copies the user template to `./template.tex`, replacing any existing one.
    Init {
        /// Edit the template after initialization.
        #[arg(long)]
        edit: bool,
    },

    /// Create and initialize a new subject directory.
    New {
        /// Directory to create; must not exist yet.
        subject: PathBuf,

        /// Edit the template after initialization.
        #[arg(long)]
        edit: bool,
    },

    /// Create a note for the current date and open it in your editor.
    ///
    /// If a note already exists for the current date, it is not overwritten.
    Note {
        /// Specify the editor to use.
        #[arg(long)]
        editor: Option<String>,
    },

    /// Build notes into notes.pdf.
    ///
    /// Dates are ISO 8601 calendar dates: YYYY-MM-DD, optionally followed
    /// by `.tex`. Notes in the range come first, in directory order,
    /// followed by the explicitly named dates in the order given.
    Build {
        /// Only build notes for this inclusive date range.
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        date_range: Option<Vec<String>>,

        /// Additional notes to build, by date.
        #[arg(value_name = "DATE")]
        dates: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Every guard taken inside `run` is dropped before the process exits.
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("NOTESTITCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("notestitch=info"),
        _ => EnvFilter::new("notestitch=debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => Config::default_dir()?,
    };
    let cfg = Config::load(&config_dir)?;

    // The user template must exist before any subcommand runs. Commands that
    // need it fail on their own if this does not work out.
    if let Err(e) = cfg.ensure_user_template() {
        eprintln!(
            "Warning: Could not create user template ({}): {:#}",
            cfg.user_template().display(),
            e
        );
    }

    let cwd = std::env::current_dir().context("Could not determine the current directory")?;

    match cli.command {
        Commands::Init { edit } => {
            let template = init_subject(&cfg, &cwd)?;
            if edit {
                open_in_editor(&resolve_editor(None, cfg.editor.as_deref()), &template)?;
            }
        }
        Commands::New { subject, edit } => {
            let template = new_subject(&cfg, &subject)?;
            println!("Created subject {}", subject.display());
            if edit {
                open_in_editor(&resolve_editor(None, cfg.editor.as_deref()), &template)?;
            }
        }
        Commands::Note { editor } => {
            let path = touch_note(&cwd, NoteDate::today())?;
            let editor = resolve_editor(editor.as_deref(), cfg.editor.as_deref());
            open_in_editor(&editor, &path)?;
        }
        Commands::Build { date_range, dates } => {
            let range = date_range
                .as_ref()
                .map(|bounds| (bounds[0].as_str(), bounds[1].as_str()));
            let request = BuildRequest::parse(range, &dates)?;
            let renderer = JinjaRenderer::new(&cwd)?;
            let compiler = ProcessCompiler::from_config(&cfg.compiler);

            let report = run_build(&cwd, &request, &renderer, &compiler).await?;
            if report.is_empty() {
                println!("No notes to build.");
            } else if report.compiler.map(|s| s.success).unwrap_or(false) {
                println!("Built {} notes into {}", report.notes, PDF_FILENAME);
            }
        }
    }

    Ok(())
}
