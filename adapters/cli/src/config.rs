//! Layered configuration: command-line flags override the TOML file, which
//! overrides the built-in defaults.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rain_dodge_core::{CanvasSize, Difficulty};
use serde::Deserialize;
use thiserror::Error;

/// Canvas width used when neither the file nor the flags provide one.
pub(crate) const DEFAULT_CANVAS_WIDTH: u32 = 400;
/// Canvas height used when neither the file nor the flags provide one.
pub(crate) const DEFAULT_CANVAS_HEIGHT: u32 = 300;
/// Cell size used when neither the file nor the flags provide one.
pub(crate) const DEFAULT_GRID_SIZE: u32 = 10;
/// Largest accepted canvas side in pixels.
pub(crate) const MAX_CANVAS_SIDE: u32 = 8192;

/// Failures raised while loading or resolving the configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}")]
    Read {
        /// Location of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML or contains unknown keys.
    #[error("failed to parse config file {path}")]
    Parse {
        /// Location of the file.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: toml::de::Error,
    },
    /// The resolved canvas exceeds [`MAX_CANVAS_SIDE`] on some side.
    #[error(
        "canvas {width}x{height} is too large (at most {} pixels per side)",
        MAX_CANVAS_SIDE
    )]
    CanvasTooLarge {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
}

/// Keys accepted in the TOML file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) canvas_width: Option<u32>,
    pub(crate) canvas_height: Option<u32>,
    pub(crate) grid_size: Option<u32>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) seed: Option<u64>,
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: Option<bool>,
}

impl FileConfig {
    /// Reads and parses the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Values supplied on the command line; `None` defers to the file.
#[derive(Clone, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) canvas_width: Option<u32>,
    pub(crate) canvas_height: Option<u32>,
    pub(crate) grid_size: Option<u32>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) seed: Option<u64>,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

/// Fully resolved settings used to boot the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) canvas: CanvasSize,
    pub(crate) grid_size: u32,
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: Option<u64>,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Settings {
    /// Merges flags, file and defaults in that order of precedence.
    pub(crate) fn resolve(overrides: &Overrides, file: &FileConfig) -> Result<Self, ConfigError> {
        let width = overrides
            .canvas_width
            .or(file.canvas_width)
            .unwrap_or(DEFAULT_CANVAS_WIDTH);
        let height = overrides
            .canvas_height
            .or(file.canvas_height)
            .unwrap_or(DEFAULT_CANVAS_HEIGHT);
        if width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(ConfigError::CanvasTooLarge { width, height });
        }

        Ok(Self {
            canvas: CanvasSize::new(width, height),
            grid_size: overrides
                .grid_size
                .or(file.grid_size)
                .unwrap_or(DEFAULT_GRID_SIZE),
            difficulty: overrides.difficulty.or(file.difficulty).unwrap_or_default(),
            seed: overrides.seed.or(file.seed),
            vsync: overrides.vsync || file.vsync.unwrap_or(false),
            show_fps: overrides.show_fps || file.show_fps.unwrap_or(false),
        })
    }
}
