use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

/// Environment override for the ledger directory, consulted once at startup.
pub const DB_DIR_ENV: &str = "OUTLAY_DB_DIR";

#[derive(Parser, Debug)]
#[command(name = "outlay", about = "Outlay - expense ledger MCP server")]
pub struct CliArgs {
    /// Path to config file
    #[arg(short, long, default_value = "outlay.toml")]
    pub config: String,

    /// Directory to keep the ledger file in (overrides config file and env)
    #[arg(short, long)]
    pub db_dir: Option<PathBuf>,

    /// Log level (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,

    #[serde(default = "default_catalog")]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Explicit ledger directory. Trusted as-is, no writability probe.
    #[serde(default)]
    pub db_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// JSON document served as the expense://categories resource.
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        json: false,
    }
}

fn default_catalog() -> CatalogConfig {
    CatalogConfig {
        path: default_catalog_path(),
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("categories.json")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage: StorageConfig::default(),
            logging: default_logging(),
            catalog: default_catalog(),
        }
    }
}

impl Config {
    pub fn load(cli: &CliArgs) -> Self {
        let mut config = match std::fs::read_to_string(&cli.config) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("Warning: Failed to parse config file: {}", e);
                Config::default()
            }),
            Err(_) => Config::default(),
        };

        // CLI beats the environment, the environment beats the file.
        if let Some(ref dir) = cli.db_dir {
            config.storage.db_dir = Some(dir.clone());
        } else if let Ok(dir) = std::env::var(DB_DIR_ENV) {
            if !dir.is_empty() {
                config.storage.db_dir = Some(PathBuf::from(dir));
            }
        }
        if let Some(ref level) = cli.log_level {
            config.logging.level = level.clone();
        }

        config
    }
}
