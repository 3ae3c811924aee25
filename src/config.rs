//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`DSC_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Vehicle configuration
    #[serde(default)]
    pub vehicle: VehicleConfig,
    /// Physics configuration
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Scene and asset locations
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`DSC_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // DSC_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("DSC_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Drivescape - Konya".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
        }
    }
}

/// Vehicle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Spawn position [x, y, z], used when the scene has none
    pub spawn_position: [f32; 3],
    /// Units per second squared
    pub acceleration: f32,
    /// Units per second
    pub max_speed: f32,
    /// Radians per second at full speed
    pub steering_speed: f32,
    /// Chassis box half extents [x, y, z]
    pub chassis_half_extents: [f32; 3],
    pub mass: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            spawn_position: [0.0, 0.0, 2.0],
            acceleration: 12.0,
            max_speed: 20.0,
            steering_speed: 2.0,
            chassis_half_extents: [1.0, 0.5, 0.4],
            mass: 20.0,
        }
    }
}

/// Physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity along Z (negative = downward)
    pub gravity: f32,
    /// Floor Z position
    pub floor_z: f32,
    /// Speed under which a body counts as idle
    pub sleep_speed_limit: f32,
    /// Seconds idle before a body sleeps
    pub sleep_time_limit: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -9.82,
            floor_z: 0.0,
            sleep_speed_limit: 0.1,
            sleep_time_limit: 1.0,
        }
    }
}

/// Scene and asset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene RON file
    pub path: PathBuf,
    /// Resource manifest RON file
    pub manifest: PathBuf,
    /// Root that model and texture paths are relative to
    pub asset_root: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/scenes/konya.ron"),
            manifest: PathBuf::from("assets/resources.ron"),
            asset_root: PathBuf::from("assets"),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Use debug placements and build the debug panel
    pub enabled: bool,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Show physics colliders
    pub show_colliders: bool,
    /// Reload model files when they change on disk
    pub hot_reload: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_level: "info".to_string(),
            show_colliders: false,
            hot_reload: false,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
