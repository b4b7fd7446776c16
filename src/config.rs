//! User configuration.
//!
//! Configuration is a plain value built once at startup and passed to every
//! command. It lives in a per-user directory (`~/.config/notestitch` on
//! Linux) which holds the user template that new subjects are seeded from,
//! and an optional `config.toml`:
//!
//! ```toml
//! editor = "nvim"
//!
//! [compiler]
//! program = "pdflatex"
//! args = ["-interaction=nonstopmode"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::NoteError;

/// Template written to the user directory on first run.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/template.tex");

const CONFIG_FILENAME: &str = "config.toml";
const USER_TEMPLATE_FILENAME: &str = "template.tex";

#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    pub editor: Option<String>,
    pub compiler: CompilerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompilerConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Passed before the input filename.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
        }
    }
}

fn default_program() -> String {
    "pdflatex".to_string()
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    editor: Option<String>,
    #[serde(default)]
    compiler: CompilerConfig,
}

impl Config {
    /// The platform's per-user configuration directory for notestitch.
    pub fn default_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("notestitch"))
            .context("Could not determine the user configuration directory")
    }

    /// Load settings from `config_dir`. A missing `config.toml` means defaults.
    pub fn load(config_dir: &Path) -> Result<Config> {
        let path = config_dir.join(CONFIG_FILENAME);
        let file = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| NoteError::fs("read", &path, e))?;
            toml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        if file.compiler.program.trim().is_empty() {
            anyhow::bail!("compiler.program must not be empty");
        }

        Ok(Config {
            config_dir: config_dir.to_path_buf(),
            editor: file.editor.filter(|e| !e.trim().is_empty()),
            compiler: file.compiler,
        })
    }

    pub fn user_template(&self) -> PathBuf {
        self.config_dir.join(USER_TEMPLATE_FILENAME)
    }

    /// First-run setup: write the packaged template to the user directory
    /// unless one is already there. Returns whether a template was written.
    pub fn ensure_user_template(&self) -> Result<bool> {
        let template = self.user_template();
        if template.exists() {
            return Ok(false);
        }
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| NoteError::fs("create directory", &self.config_dir, e))?;
        fs::write(&template, DEFAULT_TEMPLATE)
            .map_err(|e| NoteError::fs("create user template", &template, e))?;
        tracing::info!(path = %template.display(), "created user template");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_config_file() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::load(tmp.path()).unwrap();
        assert_eq!(cfg.compiler.program, "pdflatex");
        assert!(cfg.compiler.args.is_empty());
        assert!(cfg.editor.is_none());
        assert_eq!(cfg.user_template(), tmp.path().join("template.tex"));
    }

    #[test]
    fn test_config_file_overrides() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"editor = "nano"

[compiler]
program = "lualatex"
args = ["-interaction=nonstopmode"]
"#,
        )
        .unwrap();
        let cfg = Config::load(tmp.path()).unwrap();
        assert_eq!(cfg.editor.as_deref(), Some("nano"));
        assert_eq!(cfg.compiler.program, "lualatex");
        assert_eq!(cfg.compiler.args, vec!["-interaction=nonstopmode"]);
    }

    #[test]
    fn test_partial_compiler_table_keeps_default_program() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[compiler]\nargs = [\"-halt-on-error\"]\n",
        )
        .unwrap();
        let cfg = Config::load(tmp.path()).unwrap();
        assert_eq!(cfg.compiler.program, "pdflatex");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "edtior = 3\n").unwrap();
        assert!(Config::load(tmp.path()).is_err());

        fs::write(tmp.path().join("config.toml"), "[compiler]\nprogram = \"\"\n").unwrap();
        assert!(Config::load(tmp.path()).is_err());
    }

    #[test]
    fn test_ensure_user_template_creates_once() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("notestitch");
        let cfg = Config::load(&dir).unwrap();

        assert!(cfg.ensure_user_template().unwrap());
        let written = fs::read_to_string(cfg.user_template()).unwrap();
        assert_eq!(written, DEFAULT_TEMPLATE);

        fs::write(cfg.user_template(), "customized").unwrap();
        assert!(!cfg.ensure_user_template().unwrap());
        assert_eq!(fs::read_to_string(cfg.user_template()).unwrap(), "customized");
    }

    #[test]
    fn test_default_template_uses_custom_delimiters() {
        assert!(DEFAULT_TEMPLATE.contains("((*"));
        assert!(DEFAULT_TEMPLATE.contains("((("));
        assert!(!DEFAULT_TEMPLATE.contains("{%"));
    }
}
