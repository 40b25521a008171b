//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.navhud/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::message::parse_timeout_secs;
use crate::core::overlay::OverlayStyle;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NavhudConfig {
    #[serde(default)]
    pub notification: NotificationConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NotificationConfig {
    pub default_timeout_secs: Option<f64>,
    pub platform_banner: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OverlayConfig {
    pub font_size: Option<f32>,
    pub cancel_label: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LogConfig {
    pub file: Option<String>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DemoConfig {
    pub job_steps: Option<u32>,
    pub step_interval_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_LOG_FILE: &str = "navhud.log";
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;
pub const DEFAULT_JOB_STEPS: u32 = 8;
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(600);

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub default_timeout: Duration,
    pub platform_banner: bool,
    pub overlay: OverlayStyle,
    pub log_file: PathBuf,
    pub log_level: log::LevelFilter,
    pub job_steps: u32,
    pub step_interval: Duration,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub timeout_secs: Option<f64>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.navhud/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".navhud").join("config.toml"))
}

/// Load config from `~/.navhud/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `NavhudConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<NavhudConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(NavhudConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(NavhudConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: NavhudConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# navhud Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [notification]
# default_timeout_secs = 5.0         # Or set NAVHUD_DEFAULT_TIMEOUT env var
# platform_banner = false            # true = leave banners to the platform

# [overlay]
# font_size = 30
# cancel_label = "cancel"

# [log]
# file = "navhud.log"                # Or set NAVHUD_LOG_FILE env var
# level = "debug"                    # Or set NAVHUD_LOG_LEVEL env var

# [demo]
# job_steps = 8
# step_interval_ms = 600
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &NavhudConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Timeout: CLI → env → config → default
    let default_timeout = cli
        .timeout_secs
        .map(|s| s.to_string())
        .or_else(|| std::env::var("NAVHUD_DEFAULT_TIMEOUT").ok())
        .or_else(|| config.notification.default_timeout_secs.map(|s| s.to_string()))
        .and_then(|raw| match parse_timeout_secs(&raw) {
            Ok(timeout) => Some(timeout),
            Err(e) => {
                warn!("Ignoring configured default timeout: {e}");
                None
            }
        })
        .unwrap_or(DEFAULT_TIMEOUT);

    // Log file: CLI → env → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| std::env::var("NAVHUD_LOG_FILE").ok())
        .or_else(|| config.log.file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    // Log level: CLI → env → config → default
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("NAVHUD_LOG_LEVEL").ok())
        .or_else(|| config.log.level.clone())
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let mut overlay = OverlayStyle::default();
    if let Some(size) = config.overlay.font_size {
        overlay.font_size = size;
    }
    if let Some(ref label) = config.overlay.cancel_label {
        overlay.cancel_label = label.clone();
    }

    ResolvedConfig {
        default_timeout,
        platform_banner: config.notification.platform_banner.unwrap_or(false),
        overlay,
        log_file: PathBuf::from(log_file),
        log_level,
        job_steps: config.demo.job_steps.unwrap_or(DEFAULT_JOB_STEPS).max(1),
        step_interval: config
            .demo
            .step_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_STEP_INTERVAL),
    }
}
