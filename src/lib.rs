//! # notestitch
//!
//! Stitch dated note files together through a LaTeX template and build a
//! single PDF.
//!
//! A *subject directory* holds a `template.tex` and one file per day of
//! notes, named `YYYY-MM-DD.tex`. `notestitch build` selects notes by date,
//! renders them into the template and runs `pdflatex` on the result.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │  locate  │──▶│  select  │──▶│   read   │──▶│  render  │──▶│ compile  │
//! │ *.tex    │   │ range +  │   │  notes   │   │ template │   │ pdflatex │
//! │ by date  │   │ explicit │   │          │   │ notes.tex│   │ notes.pdf│
//! └──────────┘   └──────────┘   └──────────┘   └──────────┘   └──────────┘
//!       └──────────────── held under .notestitch.lock ─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! notestitch new algebra        # create a subject from the user template
//! cd algebra
//! notestitch note               # open today's note in $EDITOR
//! notestitch build              # render every note into notes.pdf
//! notestitch build --date-range 2024-01-01 2024-01-31
//! notestitch build 2024-02-14   # only the notes named on the command line
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | User configuration and first-run template |
//! | [`date`] | `YYYY-MM-DD` parsing and date ranges |
//! | [`locate`] | Finding dated notes in a subject directory |
//! | [`select`] | Filtering by range and explicit dates |
//! | [`lock`] | Build lock sentinel |
//! | [`render`] | Template rendering |
//! | [`compile`] | Running the typesetter |
//! | [`build`] | The build pipeline |
//! | [`subject`] | `init` / `new` |
//! | [`note`] | Today's note |
//! | [`editor`] | Launching the user's editor |

pub mod build;
pub mod compile;
pub mod config;
pub mod date;
pub mod editor;
pub mod error;
pub mod locate;
pub mod lock;
pub mod models;
pub mod note;
pub mod render;
pub mod select;
pub mod subject;
