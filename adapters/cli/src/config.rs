//! Optional TOML configuration merged with command-line overrides.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use alien_maze_core::MazeVariant;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Configuration read from the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "alien-maze.toml";
/// Best-time store used when neither the file nor the command line names one.
pub(crate) const DEFAULT_STORE_PATH: &str = "alien-maze-best.toml";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    game: GameSection,
    window: WindowSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct GameSection {
    variant: Option<MazeVariant>,
    storage_key: Option<String>,
    store_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct WindowSection {
    title: String,
    width: u32,
    height: u32,
    vsync: bool,
    show_fps: bool,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            title: "Alien Maze".to_owned(),
            width: 960,
            height: 960,
            vsync: true,
            show_fps: false,
        }
    }
}

/// Values supplied on the command line; they take precedence over the file.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) variant: Option<MazeVariant>,
    pub(crate) store_path: Option<PathBuf>,
    pub(crate) no_vsync: bool,
    pub(crate) show_fps: bool,
}

/// Fully resolved settings for one invocation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) variant: MazeVariant,
    pub(crate) storage_key: String,
    pub(crate) store_path: PathBuf,
    pub(crate) window_title: String,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl FileConfig {
    /// Reads and parses a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Reads a configuration file, falling back to defaults when it does not exist.
    pub(crate) fn load_or_default(path: &Path) -> Result<Self> {
        match fs::metadata(path) {
            Ok(_) => Self::load(path),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(error) => {
                Err(error).with_context(|| format!("failed to inspect config {}", path.display()))
            }
        }
    }

    /// Merges the file with command-line overrides.
    pub(crate) fn resolve(self, overrides: Overrides) -> Settings {
        let Self { game, window } = self;
        let variant = overrides.variant.or(game.variant).unwrap_or_default();
        let storage_key = game
            .storage_key
            .unwrap_or_else(|| variant.default_storage_key().to_owned());
        let store_path = overrides
            .store_path
            .or(game.store_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH));

        Settings {
            variant,
            storage_key,
            store_path,
            window_title: window.title,
            window_width: window.width,
            window_height: window.height,
            vsync: window.vsync && !overrides.no_vsync,
            show_fps: window.show_fps || overrides.show_fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config =
            FileConfig::load_or_default(&dir.path().join("missing.toml")).expect("defaults");

        let settings = config.resolve(Overrides::default());

        assert_eq!(
            settings,
            Settings {
                variant: MazeVariant::Grid,
                storage_key: "alienMazeBest".to_owned(),
                store_path: PathBuf::from(DEFAULT_STORE_PATH),
                window_title: "Alien Maze".to_owned(),
                window_width: 960,
                window_height: 960,
                vsync: true,
                show_fps: false,
            }
        );
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("alien-maze.toml");
        fs::write(
            &path,
            r#"
[game]
variant = "path"
store_path = "saves/best.toml"

[window]
title = "Path runner"
width = 640
height = 480
vsync = false
"#,
        )
        .expect("config written");

        let settings = FileConfig::load_or_default(&path)
            .expect("valid config")
            .resolve(Overrides::default());

        assert_eq!(settings.variant, MazeVariant::Path);
        assert_eq!(settings.storage_key, "alienPathBest");
        assert_eq!(settings.store_path, PathBuf::from("saves/best.toml"));
        assert_eq!(settings.window_title, "Path runner");
        assert_eq!((settings.window_width, settings.window_height), (640, 480));
        assert!(!settings.vsync);
    }

    #[test]
    fn command_line_overrides_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("alien-maze.toml");
        fs::write(
            &path,
            "[game]\nvariant = \"path\"\nstorage_key = \"custom\"\nstore_path = \"a.toml\"\n",
        )
        .expect("config written");

        let settings = FileConfig::load_or_default(&path)
            .expect("valid config")
            .resolve(Overrides {
                variant: Some(MazeVariant::Grid),
                store_path: Some(PathBuf::from("b.toml")),
                no_vsync: true,
                show_fps: true,
            });

        assert_eq!(settings.variant, MazeVariant::Grid);
        // An explicit key is kept even when the variant changes.
        assert_eq!(settings.storage_key, "custom");
        assert_eq!(settings.store_path, PathBuf::from("b.toml"));
        assert!(!settings.vsync);
        assert!(settings.show_fps);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("alien-maze.toml");
        fs::write(&path, "[game]\nlevels = 7\n").expect("config written");

        assert!(FileConfig::load_or_default(&path).is_err());
    }
}
