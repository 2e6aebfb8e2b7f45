//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.procbar/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::IconStyle;
use crate::core::registry::DEFAULT_CHANNEL_CAPACITY;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProcbarConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub nerdfont: Option<bool>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RegistryConfig {
    pub channel_capacity: Option<usize>,
    /// 0 keeps every finished process.
    pub retain_finished: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DemoConfig {
    pub tick_ms: Option<u64>,
    pub files_per_operation: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_RETAIN_FINISHED: usize = 256;
pub const DEFAULT_TICK_MS: u64 = 120;
pub const DEFAULT_FILES_PER_OPERATION: usize = 12;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub icons: IconStyle,
    pub log_level: LevelFilter,
    pub channel_capacity: usize,
    pub retain_finished: Option<usize>,
    pub tick: Duration,
    pub files_per_operation: usize,
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

/// Returns the path to `~/.procbar/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".procbar").join("config.toml"))
}

/// Load config from `~/.procbar/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ProcbarConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ProcbarConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ProcbarConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ProcbarConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ProcbarConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ProcbarConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# procbar configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# nerdfont = true                    # Or set PROCBAR_NERDFONT=false
# log_level = "debug"                # Or set PROCBAR_LOG_LEVEL

# [registry]
# channel_capacity = 50
# retain_finished = 256              # 0 keeps every finished process

# [demo]
# tick_ms = 120
# files_per_operation = 12
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_icons` is from the CLI flag (None = not specified).
pub fn resolve(config: &ProcbarConfig, cli_icons: Option<IconStyle>) -> ResolvedConfig {
    // Icons: CLI → env → config → default
    let icons = cli_icons
        .or_else(|| {
            std::env::var("PROCBAR_NERDFONT")
                .ok()
                .and_then(|v| parse_bool(&v))
                .map(icon_style)
        })
        .or_else(|| config.general.nerdfont.map(icon_style))
        .unwrap_or_default();

    // Log level: env → config → default
    let log_level = std::env::var("PROCBAR_LOG_LEVEL")
        .ok()
        .or_else(|| config.general.log_level.clone())
        .and_then(|s| match LevelFilter::from_str(&s) {
            Ok(level) => Some(level),
            Err(_) => {
                warn!("Unknown log level '{}', using default", s);
                None
            }
        })
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let retain_finished = match config
        .registry
        .retain_finished
        .unwrap_or(DEFAULT_RETAIN_FINISHED)
    {
        0 => None,
        n => Some(n),
    };

    ResolvedConfig {
        icons,
        log_level,
        channel_capacity: config
            .registry
            .channel_capacity
            .filter(|&c| c > 0)
            .unwrap_or(DEFAULT_CHANNEL_CAPACITY),
        retain_finished,
        tick: Duration::from_millis(config.demo.tick_ms.unwrap_or(DEFAULT_TICK_MS)),
        files_per_operation: config
            .demo
            .files_per_operation
            .unwrap_or(DEFAULT_FILES_PER_OPERATION),
    }
}

fn icon_style(nerdfont: bool) -> IconStyle {
    if nerdfont {
        IconStyle::NerdFont
    } else {
        IconStyle::Plain
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
