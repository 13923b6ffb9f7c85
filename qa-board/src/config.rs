use config::builder::DefaultState;
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "qa-board.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ValidationConfig {
    /// Require answer `user_id` values to be UUIDs
    pub strict_user_id: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub validation: ValidationConfig,
}

impl Config {
    /// Loads configuration from, in increasing priority: built-in defaults, `qa-board.toml` in
    /// the working directory, `<config dir>/qa-board/qa-board.toml`, `explicit_path` and
    /// `QA_BOARD_*` environment variables (`QA_BOARD_SERVER__PORT=9000`).
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = Self::defaults()?;

        if let Ok(current_dir) = env::current_dir() {
            let config_path = current_dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                settings = settings.add_source(File::from(config_path));
            }
        }

        if let Some(config_path) = user_config_path() {
            settings = settings.add_source(File::from(config_path).required(false));
        }

        if let Some(path) = explicit_path {
            settings = settings.add_source(File::from(path.to_path_buf()));
        }

        settings
            .add_source(
                Environment::with_prefix("QA_BOARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with a single file, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        ConfigBuilder::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "sqlite://qa_board.db")?
            .set_default("database.max_connections", 5)?
            .set_default("logging.level", "info")?
            .set_default("validation.strict_user_id", true)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qa-board").join(CONFIG_FILE_NAME))
}
