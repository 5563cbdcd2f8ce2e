use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use thiserror::Error;
use tracing::{info, warn};

/// Name of the config file looked up in the project config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 100;

/// Configuration for the taxi service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// URL (path) of the SQLite database
    pub database_url: String,
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Rows per page on list views
    pub paginate_by: i64,
    /// How long a login session lasts, in hours
    pub session_ttl_hours: i64,
    /// Name of the session cookie
    pub cookie_name: String,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub listen_addr: Option<String>,
    #[serde(default)]
    pub paginate_by: Option<i64>,
    #[serde(default)]
    pub session_ttl_hours: Option<i64>,
    #[serde(default)]
    pub cookie_name: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Command line arguments for the server
#[derive(Parser, Debug, Default)]
#[command(name = "taxi-server", about = "Taxi fleet management web service")]
pub struct CliArgs {
    /// Path of a TOML config file, instead of the one in the user config directory
    #[arg(long, env = "TAXI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to listen on, e.g. 127.0.0.1:8000
    #[arg(long, env = "TAXI_LISTEN_ADDR")]
    pub listen_addr: Option<String>,

    /// Rows per page on list views
    #[arg(long, env = "TAXI_PAGINATE_BY")]
    pub paginate_by: Option<i64>,

    /// Login session lifetime in hours
    #[arg(long, env = "TAXI_SESSION_TTL_HOURS")]
    pub session_ttl_hours: Option<i64>,

    /// Session cookie name
    #[arg(long, env = "TAXI_COOKIE_NAME")]
    pub cookie_name: Option<String>,

    /// Debug mode
    #[arg(long, env = "TAXI_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Emit logs as JSON
    #[arg(long, env = "TAXI_LOG_JSON", default_value_t = false)]
    pub log_json: bool,

    /// Also write logs to daily rolling files in this directory
    #[arg(long, env = "TAXI_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            listen_addr: update.listen_addr.unwrap_or(self.listen_addr),
            paginate_by: update.paginate_by.unwrap_or(self.paginate_by).max(1),
            session_ttl_hours: update.session_ttl_hours.unwrap_or(self.session_ttl_hours),
            cookie_name: update.cookie_name.unwrap_or(self.cookie_name),
        }
    }

    /// Returns the session lifetime as a Duration, capped at a century
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.clamp(0, MAX_SESSION_TTL_HOURS))
    }
}

impl Default for Config {
    fn default() -> Self {
        base_config(None)
    }
}

/// Returns the base (default) configuration.
///
/// When a data directory is known the database lives there.
pub fn base_config(data_dir: Option<PathBuf>) -> Config {
    let database_url = data_dir.map_or("taxi.db".to_string(), |path| {
        path.join("taxi.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        listen_addr: "127.0.0.1:8000".to_string(),
        paginate_by: 5,
        // two weeks
        session_ttl_hours: 24 * 14,
        cookie_name: "taxi_session".to_string(),
    }
}

/// Loads configuration from a TOML file.
///
/// A missing path or file is not an error and yields an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, ConfigError> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;

    let update = toml::from_str::<ConfigUpdate>(&content).map_err(|source| ConfigError::Parse {
        path: config_path.clone(),
        source,
    })?;

    info!("Loaded configuration from {:?}", config_path);
    Ok(update)
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: &CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url.clone(),
        listen_addr: args.listen_addr.clone(),
        paginate_by: args.paginate_by,
        session_ttl_hours: args.session_ttl_hours,
        cookie_name: args.cookie_name.clone(),
    }
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
pub fn get_config(args: &CliArgs) -> Result<Config, ConfigError> {
    let project_dirs = ProjectDirs::from("com", "taxi-service", "taxi-service");
    if project_dirs.is_none() {
        warn!("Could not determine XDG directories, skipping config file");
    }

    let data_dir = project_dirs
        .as_ref()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .filter(|path| path.exists());

    let config_path = args.config.clone().or_else(|| {
        project_dirs
            .as_ref()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    });

    let config = base_config(data_dir)
        .apply_update(config_from_file(config_path)?)
        .apply_update(config_from_args(args));

    info!(
        "Final configuration: database_url={}, listen_addr={}, paginate_by={}, session_ttl={}h",
        config.database_url, config.listen_addr, config.paginate_by, config.session_ttl_hours
    );

    Ok(config)
}

#[cfg(test)]
mod prop_tests;
