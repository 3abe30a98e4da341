use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
    #[serde(default = "default_true")]
    pub backup_before_regenerate: bool,
    #[serde(default = "default_server_host")]
    pub server_host: String,
    #[serde(default = "default_server_port")]
    pub server_port: u16,
    #[serde(default = "default_tile_url_template")]
    pub tile_url_template: String,
    #[serde(default = "default_tile_subdomains")]
    pub tile_subdomains: Vec<String>,
    #[serde(default = "default_tile_delay_ms")]
    pub tile_delay_ms: u64,
    #[serde(default = "default_tile_max_per_zoom")]
    pub tile_max_per_zoom: usize,
    #[serde(default = "default_tile_min_group_size")]
    pub tile_min_group_size: usize,
    #[serde(default = "default_tile_padding")]
    pub tile_padding: f64,
    #[serde(default = "default_tile_user_agent")]
    pub tile_user_agent: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_posts_dir() -> String {
    "_coffee_posts".to_string()
}
fn default_true() -> bool {
    true
}
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}
fn default_server_port() -> u16 {
    8081
}
fn default_tile_url_template() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}
fn default_tile_subdomains() -> Vec<String> {
    vec!["a".into(), "b".into(), "c".into()]
}
fn default_tile_delay_ms() -> u64 {
    100
}
fn default_tile_max_per_zoom() -> usize {
    50
}
fn default_tile_min_group_size() -> usize {
    2
}
fn default_tile_padding() -> f64 {
    0.1
}
fn default_tile_user_agent() -> String {
    format!("coffeetour/{} (tile cache warmer)", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            posts_dir: default_posts_dir(),
            backup_before_regenerate: default_true(),
            server_host: default_server_host(),
            server_port: default_server_port(),
            tile_url_template: default_tile_url_template(),
            tile_subdomains: default_tile_subdomains(),
            tile_delay_ms: default_tile_delay_ms(),
            tile_max_per_zoom: default_tile_max_per_zoom(),
            tile_min_group_size: default_tile_min_group_size(),
            tile_padding: default_tile_padding(),
            tile_user_agent: default_tile_user_agent(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("coffeetour")
        } else {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home.join(".coffeetour")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("coffeetour.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("coffeetour.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB path: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = crate::utils::path::expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}
