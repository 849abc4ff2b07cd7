//! Interactive input
//!
//! Password flags, edit flags and `prompt` sub-tags read their value from
//! the user when it was not given on the command line. All of that goes
//! through [`Interact`], so tests can script the answers.

pub mod editor;

pub use editor::{get_editor, scratch_path, DEFAULT_EDITOR};

use crate::error::{CliError, CliResult};
use console::Term;
use std::path::Path;

/// Source of interactively entered values
pub trait Interact {
    /// Ask for a visible line of input
    fn prompt(&self, text: &str) -> CliResult<String>;

    /// Ask for a line of input without echoing it
    fn password(&self, text: &str) -> CliResult<String>;

    /// Open `path` in an external editor and return its content afterwards
    fn edit(&self, path: &Path) -> CliResult<String>;
}

/// [`Interact`] on the controlling terminal
#[derive(Debug, Clone, Default)]
pub struct ConsoleInteract {
    editor: Option<String>,
}

impl ConsoleInteract {
    /// Prompts on stderr, editor from the environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `editor` instead of `$EDITOR` / `$VISUAL`
    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    fn ask(&self, text: &str) -> CliResult<Term> {
        let term = Term::stderr();
        term.write_str(&format!("{}: ", text.trim_end_matches(':').trim_end()))?;
        Ok(term)
    }
}

impl Interact for ConsoleInteract {
    fn prompt(&self, text: &str) -> CliResult<String> {
        Ok(self.ask(text)?.read_line()?)
    }

    fn password(&self, text: &str) -> CliResult<String> {
        Ok(self.ask(text)?.read_secure_line()?)
    }

    fn edit(&self, path: &Path) -> CliResult<String> {
        let editor = match &self.editor {
            Some(editor) => editor.clone(),
            None => get_editor(),
        };
        editor::open_in_editor(&editor, path)?;
        std::fs::read_to_string(path).map_err(CliError::from)
    }
}
