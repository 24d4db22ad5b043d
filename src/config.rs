//! User configuration (`config.toml`).

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Two-letter column names stop at `ZZ`.
pub const MAX_COLS: usize = 702;
pub const MAX_ROWS: usize = 65_536;
const MIN_CELL_WIDTH: usize = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Refusing to read {path}: file too large ({size} bytes, max {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid: GridConfig,
    pub display: DisplayConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            rows: 100,
            cols: 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Characters per rendered cell
    pub cell_width: usize,
    /// Rows shown by `show`
    pub window_rows: usize,
    /// Columns shown by `show`
    pub window_cols: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            cell_width: 7,
            window_rows: 20,
            window_cols: 10,
        }
    }
}

impl Config {
    /// Apply command-line overrides, then validate.
    pub fn with_overrides(
        mut self,
        rows: Option<usize>,
        cols: Option<usize>,
    ) -> Result<Self, ConfigError> {
        if let Some(rows) = rows {
            self.grid.rows = rows;
        }
        if let Some(cols) = cols {
            self.grid.cols = cols;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_ROWS).contains(&self.grid.rows) {
            return Err(ConfigError::Invalid(format!(
                "grid.rows must be between 1 and {}",
                MAX_ROWS
            )));
        }
        if !(1..=MAX_COLS).contains(&self.grid.cols) {
            return Err(ConfigError::Invalid(format!(
                "grid.cols must be between 1 and {}",
                MAX_COLS
            )));
        }
        if self.display.cell_width < MIN_CELL_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "display.cell_width must be at least {}",
                MIN_CELL_WIDTH
            )));
        }
        Ok(())
    }
}

/// Load configuration from `explicit`, or from the user config file if present.
///
/// A missing default file yields the defaults; a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => match user_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let config = read_config_file(&path)?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    let meta = std::fs::metadata(path).map_err(io_err)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            max: MAX_CONFIG_FILE_BYTES,
        });
    }
    let content = std::fs::read_to_string(path).map_err(io_err)?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellsheet")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.grid.rows, 100);
        assert_eq!(config.display.cell_width, 7);
    }

    #[test]
    fn test_partial_tables_keep_defaults() {
        let config = parse_config("[grid]\nrows = 5\n[display]\ncell_width = 12\n").unwrap();
        assert_eq!(config.grid, GridConfig { rows: 5, cols: 100 });
        assert_eq!(config.display.cell_width, 12);
        assert_eq!(config.display.window_rows, 20);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_config("[grid]\nrowz = 5\n").is_err());
        assert!(parse_config("[theme]\ncolor = \"red\"\n").is_err());
    }

    #[test]
    fn test_validation() {
        let mut config = Config::default();
        config.grid.cols = MAX_COLS + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config::default().with_overrides(Some(0), None);
        assert!(matches!(config, Err(ConfigError::Invalid(_))));

        let config = Config::default().with_overrides(Some(usize::MAX), Some(MAX_COLS));
        assert!(matches!(config, Err(ConfigError::Invalid(_))));

        let config = Config::default().with_overrides(Some(MAX_ROWS), Some(MAX_COLS));
        assert!(config.is_ok());

        let mut config = Config::default();
        config.display.cell_width = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let config = Config::default().with_overrides(Some(3), Some(4)).unwrap();
        assert_eq!(config.grid, GridConfig { rows: 3, cols: 4 });
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[grid]\ncols = 26").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.grid.cols, 26);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            load_config(Some(missing.as_path())),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[grid]\ncols = 0").unwrap();
        assert!(matches!(
            load_config(Some(file.path())),
            Err(ConfigError::Invalid(_))
        ));
    }
}
