//! External editor support for edit flags

use crate::error::{CliError, CliResult};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Editor used when neither `$EDITOR` nor `$VISUAL` is set
pub const DEFAULT_EDITOR: &str = "vim";

/// Gets the editor command from environment.
/// Checks $EDITOR, then $VISUAL, then falls back to [`DEFAULT_EDITOR`].
pub fn get_editor() -> String {
    ["EDITOR", "VISUAL"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|editor| !editor.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// File the editor is opened on: the `FILE:` of the annotation, or a
/// per-process scratch file in the temp directory
pub fn scratch_path(edit_file: Option<&str>, field: &str) -> PathBuf {
    match edit_file {
        Some(file) => PathBuf::from(file),
        None => env::temp_dir().join(format!("argbind_{}_{}.edit", field, std::process::id())),
    }
}

/// Run `editor` on `path` and wait for it to exit.
///
/// `editor` may carry arguments, e.g. `code --wait`.
pub fn open_in_editor(editor: &str, path: &Path) -> CliResult<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| CliError::EditorError("empty editor command".to_string()))?;

    debug!(target: "argbind::input", editor, path = %path.display(), "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| CliError::EditorError(format!("failed to launch '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(CliError::EditorError(format!(
            "'{}' exited with non-zero status",
            editor
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scratch_path() {
        assert_eq!(scratch_path(Some("MSG"), "msg"), PathBuf::from("MSG"));
        let tmp = scratch_path(None, "msg");
        assert!(tmp.starts_with(env::temp_dir()));
        assert!(tmp.to_string_lossy().contains("argbind_msg_"));
    }

    #[cfg(unix)]
    #[test]
    fn test_open_in_editor_runs_command() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("note.txt");
        std::fs::write(&path, "before").unwrap();

        // `true` accepts any argument and exits 0
        open_in_editor("true", &path).unwrap();
        assert!(open_in_editor("false", &path).is_err());
        assert!(open_in_editor("   ", &path).is_err());
        assert!(open_in_editor("argbind-no-such-editor", &path).is_err());
    }
}
