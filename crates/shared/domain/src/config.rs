use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub logging: LoggingConfig,
    pub town: TownConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Logging output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    pub console: bool,
    /// Directory for rolling log files; file logging is off when unset.
    pub directory: Option<PathBuf>,
    pub json: bool,
    /// Extra filter directives, e.g. `skyline_buildings=trace`.
    pub filter: Option<String>,
    pub max_files: usize,
}

/// The set of buildings to place on startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TownConfig {
    pub buildings: Vec<BuildingSpec>,
}

/// One building to place: its position and the attributes of its shared type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BuildingSpec {
    pub x: i32,
    pub y: i32,
    pub name: String,
    pub texture: String,
    pub color: String,
}

impl BuildingSpec {
    #[must_use]
    pub fn new(
        x: i32,
        y: i32,
        name: impl Into<String>,
        texture: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self { x, y, name: name.into(), texture: texture.into(), color: color.into() }
    }
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            console: true,
            directory: None,
            json: false,
            filter: None,
            max_files: 10,
        }
    }
}

impl Default for TownConfig {
    fn default() -> Self {
        Self {
            buildings: vec![
                BuildingSpec::new(10, 20, "House", "Brick", "Red"),
                BuildingSpec::new(15, 25, "House", "Brick", "Red"),
                BuildingSpec::new(5, 10, "Shop", "Wood", "Blue"),
            ],
        }
    }
}
