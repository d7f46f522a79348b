use std::path::{Path, PathBuf};

use crate::core::ColorThemeId;

const DEFAULT_SCRIPT_EXTENSION: &str = "lua";
const DEFAULT_SCRIPT_RUNNER: &str = "lua";
const DEFAULT_SCROLL_MULTIPLIER: usize = 3;
const FALLBACK_EDITOR: &str = "vi";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub theme: ColorThemeId,
    pub editor: Option<String>,
    pub script_extension: String,
    pub script_runner: String,
    pub scroll_multiplier: usize,
    pub show_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ColorThemeId::default(),
            editor: None,
            script_extension: DEFAULT_SCRIPT_EXTENSION.to_string(),
            script_runner: DEFAULT_SCRIPT_RUNNER.to_string(),
            scroll_multiplier: DEFAULT_SCROLL_MULTIPLIER,
            show_hidden: true,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        parse_config(&content)
    }

    /// Editor command: the configured one, then `$VISUAL`, then `$EDITOR`.
    pub fn editor_command(&self) -> String {
        pick_editor(
            self.editor.as_deref(),
            std::env::var("VISUAL").ok().as_deref(),
            std::env::var("EDITOR").ok().as_deref(),
        )
    }
}

fn pick_editor(configured: Option<&str>, visual: Option<&str>, editor: Option<&str>) -> String {
    [configured, visual, editor]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or(FALLBACK_EDITOR)
        .to_string()
}

fn parse_config(content: &str) -> Config {
    let mut config = Config::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let Some(value) = parse_string_value(value) else {
            continue;
        };
        match key.trim() {
            "theme" => {
                if let Some(theme) = ColorThemeId::from_name(&value) {
                    config.theme = theme;
                }
            }
            "editor" => config.editor = Some(value),
            "script_extension" => {
                config.script_extension = value.trim_start_matches('.').to_string();
            }
            "script_runner" => config.script_runner = value,
            "scroll_multiplier" => {
                if let Ok(multiplier) = value.parse::<usize>() {
                    if multiplier > 0 {
                        config.scroll_multiplier = multiplier;
                    }
                }
            }
            "show_hidden" => {
                if let Some(flag) = parse_bool(&value) {
                    config.show_hidden = flag;
                }
            }
            _ => {}
        }
    }
    config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_string_value(value: &str) -> Option<String> {
    let mut raw = value.trim();
    if let Some(index) = raw.find('#') {
        raw = raw[..index].trim();
    }
    if raw.is_empty() {
        return None;
    }
    let unquoted = if raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')))
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    let normalized = unquoted.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}

fn config_path() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os("MP_CONFIG_HOME") {
        return Some(PathBuf::from(home).join("config.toml"));
    }
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
    Some(base.join(Path::new("millpane").join("config.toml")))
}
