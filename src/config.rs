//! Workspace configuration: a TOML file with every field optional, then
//! command-line overrides on top.

use std::path::{Path, PathBuf};

use clap::Parser;
use indoc::indoc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ui::CellGrid;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn default_cell_width() -> i32 {
    8
}

fn default_cell_height() -> i32 {
    16
}

fn default_layout_name() -> String {
    "Default".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Pixels per terminal column.
    #[serde(default = "default_cell_width")]
    pub cell_width: i32,
    /// Pixels per terminal row.
    #[serde(default = "default_cell_height")]
    pub cell_height: i32,
    /// Where saved layouts live. Defaults to `<data_dir>/deskwm/layouts`.
    #[serde(default)]
    pub layouts_dir: Option<PathBuf>,
    /// Name offered when saving the current layout.
    #[serde(default = "default_layout_name")]
    pub default_layout_name: String,
    /// Seed for the default-position jitter; random when unset.
    #[serde(default)]
    pub jitter_seed: Option<u64>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            layouts_dir: None,
            default_layout_name: default_layout_name(),
            jitter_seed: None,
        }
    }
}

pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("deskwm").join("config.toml"))
}

pub fn default_layouts_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("deskwm")
        .join("layouts")
}

impl WorkspaceConfig {
    pub fn parse(path: &Path, buf: &str) -> Result<Self, ConfigError> {
        toml::from_str(buf).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let buf = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &buf)
    }

    /// Read `path`, or the default location. A missing default file is not an
    /// error; a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::read(path),
            None => match config_file() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn apply(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.layouts_dir {
            self.layouts_dir = Some(dir.clone());
        }
        if let Some(width) = cli.cell_width {
            self.cell_width = width;
        }
        if let Some(height) = cli.cell_height {
            self.cell_height = height;
        }
        if let Some(seed) = cli.seed {
            self.jitter_seed = Some(seed);
        }
    }

    pub fn grid(&self) -> CellGrid {
        CellGrid::new(self.cell_width, self.cell_height)
    }

    pub fn layouts_dir(&self) -> PathBuf {
        self.layouts_dir.clone().unwrap_or_else(default_layouts_dir)
    }
}

const KEYS_HELP: &str = indoc! {"
    Keys:
      Alt+1..4        open Market Data, Chart, Log Viewer, Security
      Ctrl+S / Ctrl+O save layout / open the load menu
      Alt+W Alt+M     close / minimize the focused window
      Alt+X  Alt+Up   maximize or restore
      Alt+R           restore the last minimized window
      Alt+N  F6       cycle windows
      Alt+G  Alt+U    group with the window behind / ungroup
      Alt+Left/Right  switch tabs
      Esc             cancel a drag or close the menu
      Ctrl+Q          quit
"};

#[derive(Parser, Debug, Default)]
#[command(
    name = "deskwm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating multi-window workspace in the terminal",
    after_help = KEYS_HELP
)]
pub struct Cli {
    /// Config file to read instead of the default location.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding saved layouts.
    #[arg(long = "layouts-dir", value_name = "DIR")]
    pub layouts_dir: Option<PathBuf>,

    #[arg(long = "cell-width", value_name = "PX", value_parser = clap::value_parser!(i32).range(1..))]
    pub cell_width: Option<i32>,

    #[arg(long = "cell-height", value_name = "PX", value_parser = clap::value_parser!(i32).range(1..))]
    pub cell_height: Option<i32>,

    /// Seed the window placement jitter for reproducible sessions.
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = WorkspaceConfig::parse(Path::new("x.toml"), "").unwrap();
        assert_eq!(cfg, WorkspaceConfig::default());
        assert_eq!(cfg.grid(), CellGrid::new(8, 16));
    }

    #[test]
    fn fields_parse_and_unknown_keys_fail() {
        let cfg = WorkspaceConfig::parse(
            Path::new("x.toml"),
            indoc! {r#"
                cell_width = 10
                layouts_dir = "/tmp/layouts"
                jitter_seed = 42
            "#},
        )
        .unwrap();
        assert_eq!(cfg.cell_width, 10);
        assert_eq!(cfg.cell_height, 16);
        assert_eq!(cfg.layouts_dir(), PathBuf::from("/tmp/layouts"));
        assert_eq!(cfg.jitter_seed, Some(42));

        let err = WorkspaceConfig::parse(Path::new("x.toml"), "colour = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn cli_overrides_file_values() {
        let cli = Cli::try_parse_from(["deskwm", "--cell-width", "12", "--seed", "7"]).unwrap();
        let mut cfg = WorkspaceConfig::default();
        cfg.apply(&cli);
        assert_eq!(cfg.cell_width, 12);
        assert_eq!(cfg.jitter_seed, Some(7));
        assert!(Cli::try_parse_from(["deskwm", "--cell-height", "0"]).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("none.toml");
        assert!(matches!(
            WorkspaceConfig::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }
}
