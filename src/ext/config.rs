//! Config files read into argument records or any deserializable type

use crate::error::{CliError, CliResult};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Decode JSON from `reader`
pub fn read_json<T: DeserializeOwned>(reader: impl Read) -> CliResult<T> {
    Ok(serde_json::from_reader(reader)?)
}

/// Decode JSON from the file at `path`
pub fn read_json_from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> CliResult<T> {
    let file = File::open(path)?;
    read_json(BufReader::new(file))
}

/// Like [`read_json_from_file`], but a relative `path` that cannot be opened
/// is retried in the directory of the running executable.
///
/// When both attempts fail, the error of the first one is returned.
pub fn read_json_config_from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> CliResult<T> {
    let file = open_config(path.as_ref())?;
    read_json(BufReader::new(file))
}

/// Read a JSON or TOML config file, picked by extension (`.toml` is TOML,
/// anything else JSON), with the same executable-directory fallback as
/// [`read_json_config_from_file`]
pub fn read_config_from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> CliResult<T> {
    let path = path.as_ref();
    let mut file = open_config(path)?;
    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        toml::from_str(&content).map_err(|e| {
            CliError::config(format!("failed to parse TOML config {}: {}", path.display(), e))
        })
    } else {
        read_json(BufReader::new(file))
    }
}

/// Directory of the running executable
pub fn executable_dir() -> CliResult<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| CliError::config(format!("executable {} has no directory", exe.display())))
}

fn open_config(path: &Path) -> CliResult<File> {
    match File::open(path) {
        Ok(file) => Ok(file),
        Err(err) => {
            let Ok(dir) = executable_dir() else {
                return Err(err.into());
            };
            let beside = dir.join(path);
            debug!(
                target: "argbind::ext",
                path = %path.display(),
                fallback = %beside.display(),
                "config not found, trying executable directory"
            );
            File::open(&beside).map_err(|_| err.into())
        }
    }
}
