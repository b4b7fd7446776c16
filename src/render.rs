//! Template rendering.
//!
//! The [`Renderer`] trait is the seam between the build pipeline and the
//! template engine. [`JinjaRenderer`] is the real implementation: Jinja
//! syntax with delimiters chosen so they never collide with LaTeX braces.
//!
//! | Tag        | Delimiters        |
//! |------------|-------------------|
//! | block      | `((*` … `*))`     |
//! | expression | `(((` … `)))`     |
//! | comment    | `((#` … `#))`     |
//!
//! Templates see a single variable, `notes`, a list of objects with
//! `date`, `filename` and `content`. A `date` prints as `YYYY-MM-DD` and
//! has `year`, `month` and `day` attributes plus a `strftime` method:
//! `((( note.date.strftime("%B %-d, %Y") )))`. The same formatting is
//! available as a filter, `((( note.date | strftime("%B %-d, %Y") )))`.
//!
//! `include`, `import` and `extends` resolve against the subject
//! directory, so a template can pull in e.g. `preamble.tex`.

use std::fmt::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Datelike;
use minijinja::syntax::SyntaxConfig;
use minijinja::value::{from_args, Object, ObjectRepr};
use minijinja::{context, path_loader, Environment, ErrorKind, State, Value};

use crate::date::NoteDate;
use crate::models::Note;

/// Renders a template source against an ordered list of notes.
pub trait Renderer {
    fn render(&self, template: &str, notes: &[Note]) -> Result<String>;
}

pub struct JinjaRenderer {
    env: Environment<'static>,
}

impl JinjaRenderer {
    /// Creates a renderer whose template loader reads from `root`.
    pub fn new(root: &Path) -> Result<Self> {
        let mut env = Environment::new();
        env.set_syntax(
            SyntaxConfig::builder()
                .block_delimiters("((*", "*))")
                .variable_delimiters("(((", ")))")
                .comment_delimiters("((#", "#))")
                .build()
                .context("Invalid template delimiters")?,
        );
        env.set_loader(path_loader(root.to_path_buf()));
        env.add_filter("strftime", strftime);
        Ok(JinjaRenderer { env })
    }
}

impl Renderer for JinjaRenderer {
    fn render(&self, template: &str, notes: &[Note]) -> Result<String> {
        let notes: Vec<Value> = notes
            .iter()
            .map(|note| {
                context! {
                    date => Value::from_object(TemplateDate(note.date)),
                    filename => note.filename.clone(),
                    content => note.content.clone(),
                }
            })
            .collect();

        self.env
            .render_named_str("template.tex", template, context! { notes => notes })
            .map_err(|e| {
                tracing::debug!("template error: {:#}", e);
                anyhow::anyhow!("Could not render template: {}", e)
            })
    }
}

/// A note date as templates see it.
#[derive(Debug)]
struct TemplateDate(NoteDate);

impl Object for TemplateDate {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Plain
    }

    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        let date = self.0.as_naive();
        match key.as_str()? {
            "year" => Some(Value::from(date.year())),
            "month" => Some(Value::from(date.month())),
            "day" => Some(Value::from(date.day())),
            _ => None,
        }
    }

    fn call_method(
        self: &Arc<Self>,
        _state: &State<'_, '_>,
        method: &str,
        args: &[Value],
    ) -> Result<Value, minijinja::Error> {
        match method {
            "strftime" => {
                let (format,): (&str,) = from_args(args)?;
                format_date(self.0, format).map(Value::from)
            }
            _ => Err(minijinja::Error::from(ErrorKind::UnknownMethod)),
        }
    }

    fn render(self: &Arc<Self>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn strftime(value: Value, format: String) -> Result<String, minijinja::Error> {
    let date: NoteDate = value.to_string().parse().map_err(|e: crate::error::NoteError| {
        minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string())
    })?;
    format_date(date, &format)
}

fn format_date(date: NoteDate, format: &str) -> Result<String, minijinja::Error> {
    let mut out = String::new();
    write!(out, "{}", date.as_naive().format(format)).map_err(|_| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date format `{}'", format),
        )
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn note(date: &str, content: &str) -> Note {
        Note {
            date: date.parse().unwrap(),
            filename: format!("{}.tex", date),
            content: content.to_string(),
        }
    }

    fn renderer() -> JinjaRenderer {
        JinjaRenderer::new(Path::new(".")).unwrap()
    }

    #[test]
    fn test_custom_delimiters() {
        let template = "\\begin{document}\n\
                        ((* for note in notes *))\\section{((( note.date )))}\n((( note.content )))\n((* endfor *))\
                        \\end{document}";
        let out = renderer()
            .render(template, &[note("2024-01-01", "first"), note("2024-01-02", "second")])
            .unwrap();
        assert_eq!(
            out,
            "\\begin{document}\n\\section{2024-01-01}\nfirst\n\\section{2024-01-02}\nsecond\n\\end{document}"
        );
    }

    #[test]
    fn test_latex_braces_pass_through() {
        let template = "\\newcommand{\\twice}[1]{#1#1} {{ not a tag }} {% neither %} {#1}";
        let out = renderer().render(template, &[]).unwrap();
        assert_eq!(out, template);
    }

    #[test]
    fn test_order_is_preserved() {
        let out = renderer()
            .render(
                "((* for n in notes *))((( n.filename ))) ((* endfor *))",
                &[note("2024-01-05", ""), note("2024-01-01", ""), note("2024-01-05", "")],
            )
            .unwrap();
        assert_eq!(out, "2024-01-05.tex 2024-01-01.tex 2024-01-05.tex ");
    }

    #[test]
    fn test_strftime_filter() {
        let out = renderer()
            .render(
                "((* for n in notes *))((( n.date | strftime(\"%A, %B %d %Y\") )))((* endfor *))",
                &[note("2024-03-07", "")],
            )
            .unwrap();
        assert_eq!(out, "Thursday, March 07 2024");
    }

    #[test]
    fn test_date_methods_and_attributes() {
        let out = renderer()
            .render(
                "((* for n in notes *))((( n.date.strftime(\"%d/%m/%Y\") ))) \
                 ((( n.date.year )))-((( n.date.month )))-((( n.date.day )))((* endfor *))",
                &[note("2024-03-07", "")],
            )
            .unwrap();
        assert_eq!(out, "07/03/2024 2024-3-7");
    }

    #[test]
    fn test_date_compares_as_iso_string() {
        let out = renderer()
            .render(
                "((* for n in notes *))((* if n.date | string == \"2024-03-07\" *))yes((* endif *))((* endfor *))",
                &[note("2024-03-07", "")],
            )
            .unwrap();
        assert_eq!(out, "yes");
    }

    #[test]
    fn test_unknown_date_method_fails() {
        let err = renderer()
            .render(
                "((* for n in notes *))((( n.date.isoweekday() )))((* endfor *))",
                &[note("2024-03-07", "")],
            )
            .unwrap_err();
        assert!(err.to_string().starts_with("Could not render template"));
    }

    #[test]
    fn test_include_resolves_in_subject_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("preamble.tex"), "\\usepackage{amsmath}").unwrap();
        let renderer = JinjaRenderer::new(dir.path()).unwrap();

        let out = renderer
            .render(
                "((* include \"preamble.tex\" *))|((* for n in notes *))((( n.content )))((* endfor *))",
                &[note("2024-01-01", "a")],
            )
            .unwrap();
        assert_eq!(out, "\\usepackage{amsmath}|a");
    }

    #[test]
    fn test_missing_include_is_reported() {
        let dir = TempDir::new().unwrap();
        let renderer = JinjaRenderer::new(dir.path()).unwrap();

        let err = renderer
            .render("((* include \"preamble.tex\" *))", &[])
            .unwrap_err();
        assert!(err.to_string().starts_with("Could not render template"));
        assert!(err.to_string().contains("preamble.tex"));
    }

    #[test]
    fn test_comments_are_dropped() {
        let out = renderer().render("a((# hidden #))b", &[]).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = renderer().render("((* for note in *))", &[]).unwrap_err();
        assert!(err.to_string().starts_with("Could not render template"));
    }

    #[test]
    fn test_error_message_is_one_line() {
        let err = renderer().render("line one\n((* for note in *))\n", &[]).unwrap_err();
        let message = format!("{:#}", err);
        assert!(!message.contains('\n'), "multi-line error: {message}");
    }
}
