//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `TASKGUARD_DEFAULT_EXPRESSION` is unset, falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Uses built-in defaults when no file exists
//!
//! ## Environment Variables
//! - `TASKGUARD_DEFAULT_EXPRESSION`: Default recurring expression (required
//!   for environment loading)
//! - `TASKGUARD_TIME_ZONE`: Default time zone (`default` or an IANA name)
//! - `TASKGUARD_RUN_ON_INIT`: Fire new jobs once on registration (true/false)
//! - `TASKGUARD_LOG_FILTER`: `EnvFilter` directive
//! - `TASKGUARD_LOG_FORMAT`: `pretty` or `json`
//!
//! ## File Locations
//! The loader probes `taskguard.json` then `taskguard.toml` in these
//! directories (in order):
//! 1. Current working directory
//! 2. Parent directory
//! 3. Grandparent directory
//! 4. The same three, relative to the executable location
//!
//! Generic names such as `config.json` are never probed, so a host
//! application's own configuration file is left alone.

use std::path::{Path, PathBuf};

use taskguard_domain::constants::{
    ENV_DEFAULT_EXPRESSION, ENV_LOG_FILTER, ENV_LOG_FORMAT, ENV_RUN_ON_INIT, ENV_TIME_ZONE,
};
use taskguard_domain::{
    Config, LogFormat, LoggingConfig, Result, SchedulerConfig, TaskGuardError, TimeZoneSpec,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables, then from a probed
/// config file. Without either, returns [`Config::default`].
///
/// # Errors
/// Returns `TaskGuardError::Config` if:
/// - An environment variable has an invalid value
/// - A config file exists but cannot be read or parsed
pub fn load() -> Result<Config> {
    if std::env::var_os(ENV_DEFAULT_EXPRESSION).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No configuration source found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `TASKGUARD_DEFAULT_EXPRESSION` must be present; every other variable
/// falls back to its default.
///
/// # Errors
/// Returns `TaskGuardError::Config` if the expression is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let default_expression = env_var(ENV_DEFAULT_EXPRESSION)?;

    let default_time_zone = match std::env::var(ENV_TIME_ZONE) {
        Ok(raw) => raw.parse::<TimeZoneSpec>().map_err(|e| {
            TaskGuardError::Config(format!("Invalid {}: {}", ENV_TIME_ZONE, e))
        })?,
        Err(_) => TimeZoneSpec::Default,
    };

    let defaults = Config::default();
    let run_on_init = env_bool(ENV_RUN_ON_INIT, defaults.scheduler.run_on_init);
    let filter = std::env::var(ENV_LOG_FILTER).unwrap_or(defaults.logging.filter);
    let format = match std::env::var(ENV_LOG_FORMAT) {
        Ok(raw) => raw.parse::<LogFormat>().map_err(|e| {
            TaskGuardError::Config(format!("Invalid {}: {}", ENV_LOG_FORMAT, e))
        })?,
        Err(_) => defaults.logging.format,
    };

    Ok(Config {
        scheduler: SchedulerConfig { default_expression, default_time_zone, run_on_init },
        logging: LoggingConfig { filter, format },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TaskGuardError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TaskGuardError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TaskGuardError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TaskGuardError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TaskGuardError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TaskGuardError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(TaskGuardError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./taskguard.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    ["", "..", "../.."]
        .iter()
        .flat_map(|up| {
            let base = dir.join(up);
            [base.join("taskguard.json"), base.join("taskguard.toml")]
        })
        .collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns `TaskGuardError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TaskGuardError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
