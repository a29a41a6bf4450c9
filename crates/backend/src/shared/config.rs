use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub marketplaces: MarketplaceEndpoints,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NotifyConfig {
    /// Webhook notifications are skipped when unset
    pub webhook_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LlmConfig {
    /// Content generation is disabled when unset
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Marketplace API hosts. Overridden in test mode to point at stubs.
#[derive(Debug, Deserialize, Clone)]
pub struct MarketplaceEndpoints {
    pub coupang_api_url: String,
    pub naver_api_url: String,
    pub elevenst_api_url: String,
}

impl Default for MarketplaceEndpoints {
    fn default() -> Self {
        Self {
            coupang_api_url: "https://api-gateway.coupang.com".into(),
            naver_api_url: "https://api.commerce.naver.com".into(),
            elevenst_api_url: "https://api.11st.co.kr".into(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"
"#;

static CONFIG: once_cell::sync::OnceCell<Config> = once_cell::sync::OnceCell::new();

/// Load the configuration once and keep it for the lifetime of the process
pub fn init() -> anyhow::Result<&'static Config> {
    if let Some(cfg) = CONFIG.get() {
        return Ok(cfg);
    }
    let cfg = load_config()?;
    Ok(CONFIG.get_or_init(|| cfg))
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("Configuration has not been initialized")
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let resolved_path = exe_dir.join(db_path);
            return Ok(resolved_path);
        }
    }

    // Fallback: use relative to current directory
    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(config.is_ok());
        let config = config.unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert!(config.notify.webhook_url.is_none());
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_marketplace_endpoint_overrides() {
        let toml_str = r#"
            [database]
            path = "x.db"

            [marketplaces]
            coupang_api_url = "http://localhost:9001"
            naver_api_url = "http://localhost:9002"
            elevenst_api_url = "http://localhost:9003"
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.marketplaces.coupang_api_url, "http://localhost:9001");
    }
}
