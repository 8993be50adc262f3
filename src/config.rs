//! Configuration for memento paths and capture settings.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variable (MEMENTO_HOME)
//! 2. Config file (.memento/config.yaml)
//! 3. Defaults (~/.memento)
//!
//! Config file discovery:
//! - Searches current directory and parents for .memento/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub capture: Option<CaptureConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Home directory (relative to config file)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    pub thumbnail_width: Option<u32>,
    pub jpeg_quality: Option<u8>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to memento home
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Capture settings
    pub capture: CaptureSettings,
}

/// Settings applied by capture ingest.
#[derive(Debug, Clone, Copy)]
pub struct CaptureSettings {
    /// Target thumbnail width in pixels (aspect ratio preserved).
    pub thumbnail_width: u32,
    /// JPEG quality (0-100) for both the full image and the thumbnail.
    pub jpeg_quality: u8,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            thumbnail_width: 200,
            jpeg_quality: 80,
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".memento").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".memento");

    let config_file = find_config_file();

    let (home, capture) = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        let home = if let Ok(env_home) = std::env::var("MEMENTO_HOME") {
            PathBuf::from(env_home)
        } else if let Some(ref home_path) = config.paths.home {
            // home is relative to the .memento/ directory
            let memento_dir = config_path.parent().unwrap_or(Path::new("."));
            resolve_path(memento_dir, home_path)
        } else {
            default_home.clone()
        };

        let defaults = CaptureSettings::default();
        let capture = CaptureSettings {
            thumbnail_width: config
                .capture
                .as_ref()
                .and_then(|c| c.thumbnail_width)
                .unwrap_or(defaults.thumbnail_width),
            jpeg_quality: config
                .capture
                .as_ref()
                .and_then(|c| c.jpeg_quality)
                .unwrap_or(defaults.jpeg_quality),
        };

        (home, capture)
    } else {
        let home = std::env::var("MEMENTO_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_home.clone());

        (home, CaptureSettings::default())
    };

    Ok(ResolvedConfig {
        home,
        config_file,
        capture,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the memento home directory.
pub fn memento_home() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}

/// Get the memory storage root ($MEMENTO_HOME/memories) — the single
/// flat directory holding every memory's artifact files.
pub fn storage_root() -> Result<PathBuf> {
    Ok(config()?.home.join("memories"))
}

/// Get the capture settings.
pub fn capture_settings() -> Result<CaptureSettings> {
    Ok(config()?.capture)
}
