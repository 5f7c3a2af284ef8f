//! `convenant.toml` -- optional engine defaults for the CLI.
//!
//! ```toml
//! [engine]
//! today = "2026-01-01"
//! max_placeholder_depth = 5
//! ```
//!
//! Command-line flags take precedence over file values.

use std::path::{Path, PathBuf};

use convenant_eval::{parse_today, EngineOptions};
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "convenant.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub engine: EngineSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EngineSection {
    /// Evaluation date, `YYYY-MM-DD`.
    pub today: Option<String>,
    pub max_placeholder_depth: Option<usize>,
}

/// Read and parse a config file from `path`.
pub(crate) fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// Load the explicit config, else `./convenant.toml` if present, else
/// defaults. An explicit path that cannot be read is an error.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            if fallback.is_file() {
                read_config(&fallback)
            } else {
                Ok(Config::default())
            }
        }
    }
}

/// Combine file values with command-line overrides.
pub(crate) fn engine_options(
    config: &Config,
    today: Option<&str>,
    max_depth: Option<usize>,
) -> Result<EngineOptions, String> {
    let mut options = match today.or(config.engine.today.as_deref()) {
        Some(raw) => EngineOptions::for_date(parse_today(raw).map_err(|e| e.to_string())?),
        None => EngineOptions::default(),
    };
    if let Some(depth) = max_depth.or(config.engine.max_placeholder_depth) {
        options = options.with_max_depth(depth);
    }
    tracing::debug!(
        today = %options.today,
        max_depth = options.max_placeholder_depth,
        "engine options"
    );
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use time::macros::date;

    #[test]
    fn parses_engine_section() {
        let config: Config =
            toml::from_str("[engine]\ntoday = \"2026-03-01\"\nmax_placeholder_depth = 3\n").unwrap();
        assert_eq!(config.engine.today.as_deref(), Some("2026-03-01"));
        assert_eq!(config.engine.max_placeholder_depth, Some(3));
    }

    #[test]
    fn empty_file_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("[engine]\nkleur = \"rood\"\n").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let config = Config {
            engine: EngineSection {
                today: Some("2026-03-01".to_string()),
                max_placeholder_depth: Some(3),
            },
        };
        let from_file = engine_options(&config, None, None).unwrap();
        assert_eq!(from_file.today, date!(2026 - 03 - 01));
        assert_eq!(from_file.max_placeholder_depth, 3);

        let overridden = engine_options(&config, Some("2027-01-01"), Some(7)).unwrap();
        assert_eq!(overridden.today, date!(2027 - 01 - 01));
        assert_eq!(overridden.max_placeholder_depth, 7);

        assert!(engine_options(&config, Some("ooit"), None).is_err());
    }

    #[test]
    fn explicit_path_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nmax_placeholder_depth = 2").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.engine.max_placeholder_depth, Some(2));
        assert!(load_config(Some(Path::new("/bestaat/niet.toml"))).is_err());
    }
}
