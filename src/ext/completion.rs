//! Shell completion script installation

use crate::command::CommandTree;
use crate::error::{CliError, CliResult};
use minijinja::{context, Environment};
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Marker line written above the sourcing line
const AUTOGEN_MARKER: &str = "#Auto-generated by argbind";

/// Shell the completion is installed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// bash, via `~/.bashrc` or `~/.bash_profile`
    Bash,
    /// zsh, via `~/.zshrc`
    Zsh,
}

impl Shell {
    /// Profile files tried in order; the first one that opens is used
    pub fn profiles(self) -> &'static [&'static str] {
        match self {
            Shell::Bash => &[".bashrc", ".bash_profile"],
            Shell::Zsh => &[".zshrc"],
        }
    }
}

const COMPLETION_TEMPLATE: &str = r#"# {{ cli }} command completion script

COMP_WORDBREAKS=${COMP_WORDBREAKS/=/}
COMP_WORDBREAKS=${COMP_WORDBREAKS/@/}
export COMP_WORDBREAKS

__{{ cli }}_complete_fn() {
  local words="{{ commands }}"
  local cur="${COMP_WORDS[COMP_CWORD]}"
  compgen -W "$words" -- "$cur"
}

if type complete &>/dev/null; then
  _{{ cli }}_completion () {
    local si="$IFS"
    IFS=$'\n' COMPREPLY=($(__{{ cli }}_complete_fn \
                           2>/dev/null)) || return $?
    IFS="$si"
  }
  complete -F _{{ cli }}_completion {{ cli }}
elif type compdef &>/dev/null; then
  _{{ cli }}_completion() {
    si=$IFS
    compadd -- $(COMP_CWORD=$((CURRENT-1)) \
                 COMP_LINE=$BUFFER \
                 COMP_POINT=0 \
                 COMP_WORDS="${words[@]}" \
                 __{{ cli }}_complete_fn \
                 2>/dev/null)
    IFS=$si
  }
  compdef _{{ cli }}_completion {{ cli }}
elif type compctl &>/dev/null; then
  _{{ cli }}_completion () {
    local cword line point words si
    read -Ac words
    read -cn cword
    let cword-=1
    read -l line
    read -ln point
    si="$IFS"
    IFS=$'\n' reply=($(COMP_CWORD="$cword" \
                       COMP_LINE="$line" \
                       COMP_POINT="$point" \
                       COMP_WORDS="${words[@]}" \
                       __{{ cli }}_complete_fn \
                       2>/dev/null)) || return $?
    IFS="$si"
  }
  compctl -K _{{ cli }}_completion {{ cli }}
fi
"#;

fn root_name(tree: &CommandTree) -> CliResult<&str> {
    let name = tree.node(tree.root()).name();
    if name.is_empty() {
        return Err(CliError::EmptyRootName);
    }
    Ok(name)
}

/// File name of the completion script, relative to the home directory
pub fn completion_file_name(tree: &CommandTree) -> CliResult<String> {
    Ok(format!(".{}_completion", root_name(tree)?))
}

/// Render the completion script for `tree`
pub fn gen_completion(tree: &CommandTree) -> CliResult<String> {
    let cli = root_name(tree)?;
    let commands: Vec<&str> = tree
        .children(tree.root())
        .iter()
        .map(|id| tree.node(*id).name())
        .collect();

    let env = Environment::new();
    env.render_str(
        COMPLETION_TEMPLATE,
        context! { cli => cli, commands => commands.join(" ") },
    )
    .map_err(|e| CliError::TemplateError(e.to_string()))
}

/// Install the bash completion into the current user's home directory
pub fn install_bash_completion(tree: &CommandTree) -> CliResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::config("cannot determine the home directory"))?;
    install_completion(tree, &home, Shell::Bash)
}

/// Write `~/.<root>_completion` and make the shell profile source it.
///
/// The sourcing line is appended only once. Returns the script path.
pub fn install_completion(tree: &CommandTree, home: &Path, shell: Shell) -> CliResult<PathBuf> {
    let file_name = completion_file_name(tree)?;
    let script_path = home.join(&file_name);
    std::fs::write(&script_path, gen_completion(tree)?)?;

    let mut profile = None;
    let mut last_err = None;
    for name in shell.profiles() {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(home.join(name))
        {
            Ok(file) => {
                profile = Some((home.join(name), file));
                break;
            }
            Err(err) => last_err = Some(err),
        }
    }
    let Some((profile_path, mut profile)) = profile else {
        return Err(match last_err {
            Some(err) => err.into(),
            None => CliError::config("no destination profile file"),
        });
    };

    let mut content = String::new();
    profile.read_to_string(&mut content)?;
    let source_line = format!("[ -f ~/{0} ] && . ~/{0}", file_name);
    if !content.contains(&source_line) {
        write!(profile, "\n{}\n{}\n", AUTOGEN_MARKER, source_line)?;
        debug!(
            target: "argbind::ext",
            profile = %profile_path.display(),
            script = %script_path.display(),
            "installed shell completion"
        );
    }
    Ok(script_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use tempfile::TempDir;

    fn tree(name: &str) -> CommandTree {
        CommandTree::new(
            Command::new(name, "")
                .child(Command::new("build", ""))
                .child(Command::new("help", "")),
        )
        .unwrap()
    }

    #[test]
    fn test_gen_completion() {
        let script = gen_completion(&tree("demo")).unwrap();
        assert!(script.starts_with("# demo command completion script\n"));
        assert!(script.contains("local words=\"build help\""));
        assert!(script.contains("complete -F _demo_completion demo"));
        assert!(script.contains("compdef _demo_completion demo"));
        assert!(script.contains("compctl -K _demo_completion demo"));
        assert!(script.contains("${COMP_WORDBREAKS/=/}"));
    }

    #[test]
    fn test_empty_root_name() {
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(gen_completion(&tree("")), Err(CliError::EmptyRootName)));
        assert!(matches!(
            install_completion(&tree(""), temp_dir.path(), Shell::Bash),
            Err(CliError::EmptyRootName)
        ));
    }

    #[test]
    fn test_zsh_profile() {
        let temp_dir = TempDir::new().unwrap();
        install_completion(&tree("demo"), temp_dir.path(), Shell::Zsh).unwrap();
        let zshrc = std::fs::read_to_string(temp_dir.path().join(".zshrc")).unwrap();
        assert!(zshrc.contains("[ -f ~/.demo_completion ] && . ~/.demo_completion"));
        assert!(!temp_dir.path().join(".bashrc").exists());
    }
}
