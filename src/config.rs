use std::env;
use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use cross_xdg::BaseDirs;
use log::{debug, warn};

use crate::engine::DEFAULT_CELL_LIMIT;

/// How `,` obtains a character from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// One raw byte per `,`.
    #[default]
    Byte,
    /// Prompt, read a line, keep its first character.
    Line,
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "byte" | "bytes" => Ok(InputMode::Byte),
            "line" | "lines" => Ok(InputMode::Line),
            other => Err(format!("unknown input mode '{other}' (expected 'byte' or 'line')")),
        }
    }
}

/// Values found in the `[engine]` section of `bf.toml`. Missing keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSettings {
    pub cell_limit: Option<NonZeroUsize>,
    pub verbose: Option<bool>,
    pub input: Option<InputMode>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub cell_limit: NonZeroUsize,
    pub verbose: bool,
    pub input: InputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cell_limit: DEFAULT_CELL_LIMIT,
            verbose: false,
            input: InputMode::Byte,
        }
    }
}

/// What the command line asked for; `None`/`false` means "not given".
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub cell_limit: Option<NonZeroUsize>,
    pub verbose: bool,
    pub input: Option<InputMode>,
}

impl Settings {
    /// Resolve settings: flags -> env -> config file -> defaults.
    pub fn resolve(flags: Overrides, env_cell_limit: Option<&str>, file: &FileSettings) -> Self {
        let defaults = Settings::default();

        let env_cell_limit = env_cell_limit.and_then(|s| match s.trim().parse::<NonZeroUsize>() {
            Ok(limit) => Some(limit),
            Err(e) => {
                warn!("ignoring BF_CELL_LIMIT={s:?}: {e}");
                None
            }
        });

        Settings {
            cell_limit: flags
                .cell_limit
                .or(env_cell_limit)
                .or(file.cell_limit)
                .unwrap_or(defaults.cell_limit),
            verbose: flags.verbose || file.verbose.unwrap_or(defaults.verbose),
            input: flags.input.or(file.input).unwrap_or(defaults.input),
        }
    }

    /// Resolve against the real environment and the user's config file.
    pub fn load(flags: Overrides) -> Self {
        let env_cell_limit = env::var("BF_CELL_LIMIT").ok();
        let file = load_from_toml().unwrap_or_default();
        Self::resolve(flags, env_cell_limit.as_deref(), &file)
    }
}

/// Location of the config file: `BF_CONFIG` if set, else `<config home>/bf.toml`.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("BF_CONFIG") {
        return Some(PathBuf::from(path));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load_from_toml() -> Option<FileSettings> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    debug!("loaded config from {}", path.display());
    Some(parse_settings(&content))
}

/// Very small hand-rolled parser: look for the `[engine]` section and
/// `key = value` pairs. Values may be quoted or bare.
pub fn parse_settings(content: &str) -> FileSettings {
    let mut in_engine = false;
    let mut settings = FileSettings::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_engine = line[1..line.len() - 1].trim() == "engine";
            continue;
        }
        if !in_engine {
            continue;
        }
        let Some((key, raw)) = line.split_once('=') else {
            warn!("config: ignoring malformed line {line:?}");
            continue;
        };
        let key = key.trim();
        let raw = raw.trim();
        let value = if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
            &raw[1..raw.len() - 1]
        } else {
            raw
        };

        match key {
            "cell_limit" => match value.parse::<NonZeroUsize>() {
                Ok(limit) => settings.cell_limit = Some(limit),
                Err(e) => warn!("config: ignoring cell_limit {value:?}: {e}"),
            },
            "verbose" => match value {
                "true" => settings.verbose = Some(true),
                "false" => settings.verbose = Some(false),
                _ => warn!("config: ignoring verbose {value:?}: expected true or false"),
            },
            "input" => match value.parse::<InputMode>() {
                Ok(mode) => settings.input = Some(mode),
                Err(e) => warn!("config: ignoring input: {e}"),
            },
            other => warn!("config: unknown key {other:?} in [engine]"),
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn parses_engine_section() {
        let content = r#"
# user settings
[colors]
cell_limit = 1

[engine]
cell_limit = 512
verbose = true
input = "line"
"#;
        let settings = parse_settings(content);
        assert_eq!(
            settings,
            FileSettings {
                cell_limit: Some(nz(512)),
                verbose: Some(true),
                input: Some(InputMode::Line),
            }
        );
    }

    #[test]
    fn bad_values_are_ignored() {
        let content = "[engine]\ncell_limit = 0\nverbose = maybe\ninput = \"morse\"\nnonsense\n";
        assert_eq!(parse_settings(content), FileSettings::default());
    }

    #[test]
    fn flags_beat_env_beat_file() {
        let file = FileSettings {
            cell_limit: Some(nz(10)),
            verbose: Some(true),
            input: Some(InputMode::Line),
        };

        let from_file = Settings::resolve(Overrides::default(), None, &file);
        assert_eq!(from_file.cell_limit, nz(10));
        assert!(from_file.verbose);
        assert_eq!(from_file.input, InputMode::Line);

        let from_env = Settings::resolve(Overrides::default(), Some("20"), &file);
        assert_eq!(from_env.cell_limit, nz(20));

        let flags = Overrides {
            cell_limit: Some(nz(30)),
            verbose: false,
            input: Some(InputMode::Byte),
        };
        let from_flags = Settings::resolve(flags, Some("20"), &file);
        assert_eq!(from_flags.cell_limit, nz(30));
        assert_eq!(from_flags.input, InputMode::Byte);
    }

    #[test]
    fn invalid_env_falls_through() {
        let resolved = Settings::resolve(Overrides::default(), Some("zero"), &FileSettings::default());
        assert_eq!(resolved, Settings::default());
        assert_eq!(resolved.cell_limit, DEFAULT_CELL_LIMIT);
    }

    #[test]
    fn input_mode_from_str() {
        assert_eq!("Line".parse::<InputMode>(), Ok(InputMode::Line));
        assert_eq!("byte".parse::<InputMode>(), Ok(InputMode::Byte));
        assert!("tape".parse::<InputMode>().is_err());
    }
}
