//! Configuration sections with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use terraview_lod::{LodConfig, MeshCacheConfig};
use terraview_planet::SunConfig;
use terraview_render::RenderConfig;
use terraview_terrain::ProceduralPlanetParams;

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "terraview.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    /// Tier table, sea level, scales and crossover.
    pub terrain: LodConfig,
    /// Procedural planet used when no raster data is supplied.
    pub planet: ProceduralPlanetParams,
    pub cache: MeshCacheConfig,
    pub render: RenderConfig,
    pub sun: SunConfig,
    pub clock: ClockConfig,
    pub observer: ObserverConfig,
    pub debug: DebugConfig,
}

/// Output frame size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

/// Simulation time settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    /// UTC hour the simulation starts at.
    pub start_utc_hours: f64,
    /// Day of year in `[1, 365]`.
    pub day_of_year: u32,
    /// Simulated seconds per real second.
    pub time_scale: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start_utc_hours: 9.0,
            day_of_year: 172,
            time_scale: 60.0,
        }
    }
}

/// Starting pose and scripted flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObserverConfig {
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    /// Clockwise from north, degrees.
    pub heading_deg: f64,
    pub pitch_deg: f64,
    /// Ground speed along the heading.
    pub speed_m_s: f64,
    /// Real seconds between rendered frames.
    pub frame_interval_s: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            lat: 46.5,
            lon: 8.0,
            altitude_m: 2500.0,
            heading_deg: 45.0,
            pitch_deg: -8.0,
            speed_m_s: 250.0,
            frame_interval_s: 1.0,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log diagnostics every N frames.
    pub diagnostics_every_n_frames: u64,
    /// Frames rendered by a batch run.
    pub frames: u32,
    /// Where rendered frames are written.
    pub output_dir: PathBuf,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            diagnostics_every_n_frames: 10,
            frames: 8,
            output_dir: PathBuf::from("frames"),
        }
    }
}

/// Platform config directory for the viewer, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("terraview"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
