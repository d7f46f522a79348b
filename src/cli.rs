use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Browse { start: Option<PathBuf> },
    Version,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let _ = iter.next();
    let mut start = None;
    let mut options_done = false;
    for arg in iter {
        match arg.as_str() {
            _ if options_done => {}
            "--version" | "-V" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            "--" => {
                options_done = true;
                continue;
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(CliError::UnknownOption(other.to_string()));
            }
            _ => {}
        }
        if start.is_some() {
            return Err(CliError::UnexpectedArgument(arg));
        }
        start = Some(PathBuf::from(arg));
    }
    Ok(Command::Browse { start })
}

pub fn usage() -> &'static str {
    "Usage:\n  mp [PATH]\n  mp --version\n  mp --help"
}

fn build_version_tag() -> Option<&'static str> {
    option_env!("MP_BUILD_VERSION").and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

fn version_tag_for_output(cargo_version: &str, build_tag: Option<&str>) -> String {
    match build_tag {
        Some(tag) => tag.to_string(),
        None => cargo_version.to_string(),
    }
}

pub fn version_line(cargo_version: &str) -> String {
    let tag = version_tag_for_output(cargo_version, build_version_tag());
    format!("mp {tag}")
}
