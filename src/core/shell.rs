use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Output is captured; stderr becomes the failure message.
    Captured,
    /// The child inherits the terminal. Used for the editor and user commands.
    Attached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub working_dir: PathBuf,
    pub command: String,
    pub mode: ExecMode,
}

impl CommandRequest {
    pub fn captured(working_dir: &Path, command: String) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            command,
            mode: ExecMode::Captured,
        }
    }

    pub fn attached(working_dir: &Path, command: String) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            command,
            mode: ExecMode::Attached,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0}")]
    Failed(String),
    #[error("shell: {0}")]
    SpawnFailed(String),
}

pub trait CommandExecutor {
    fn execute(&self, request: &CommandRequest) -> Result<(), CommandError>;
}

/// Runs command strings through the platform shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ShellExecutor {
    fn execute(&self, request: &CommandRequest) -> Result<(), CommandError> {
        tracing::debug!("executing {:?} in {}", request.command, request.working_dir.display());
        let mut command = Command::new(default_shell_path());
        command
            .args(default_shell_args(&request.command))
            .current_dir(&request.working_dir);
        match request.mode {
            ExecMode::Captured => {
                let output = command
                    .stdin(Stdio::null())
                    .output()
                    .map_err(|error| CommandError::SpawnFailed(error.to_string()))?;
                if output.status.success() {
                    return Ok(());
                }
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = stderr.lines().find(|line| !line.trim().is_empty());
                Err(CommandError::Failed(match message {
                    Some(line) => line.trim().to_string(),
                    None => format!("command failed: {}", output.status),
                }))
            }
            ExecMode::Attached => {
                let status = command
                    .status()
                    .map_err(|error| CommandError::SpawnFailed(error.to_string()))?;
                if status.success() {
                    Ok(())
                } else {
                    Err(CommandError::Failed(format!("command failed: {status}")))
                }
            }
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn default_shell_path() -> &'static str {
    "sh"
}

#[cfg(not(target_os = "windows"))]
fn default_shell_args(command: &str) -> Vec<String> {
    vec!["-c".to_string(), command.to_string()]
}

#[cfg(target_os = "windows")]
fn default_shell_path() -> &'static str {
    "cmd"
}

#[cfg(target_os = "windows")]
fn default_shell_args(command: &str) -> Vec<String> {
    vec!["/C".to_string(), command.to_string()]
}

/// Single-quotes `arg` for a POSIX shell.
pub fn quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}

pub fn make_dir_command(path: &Path) -> String {
    format!("mkdir {}", quote_path(path))
}

pub fn touch_command(path: &Path) -> String {
    format!("touch {}", quote_path(path))
}

pub fn rename_command(from: &Path, to: &Path) -> String {
    format!("mv {} {}", quote_path(from), quote_path(to))
}

pub fn copy_command(source: &Path, target_dir: &Path) -> String {
    format!("cp -r {} {}", quote_path(source), quote_path(target_dir))
}

pub fn remove_command(path: &Path) -> String {
    format!("rm -r {}", quote_path(path))
}

/// `program` is inserted verbatim so that an editor setting such as
/// `code --wait` keeps its flags.
pub fn open_with_command(program: &str, path: &Path) -> String {
    format!("{program} {}", quote_path(path))
}

/// `args` is user input and is passed to the shell unquoted.
pub fn run_command(runner: Option<&str>, path: &Path, args: &str) -> String {
    let mut command = match runner {
        Some(runner) => open_with_command(runner, path),
        None => quote_path(path),
    };
    let args = args.trim();
    if !args.is_empty() {
        command.push(' ');
        command.push_str(args);
    }
    command
}
