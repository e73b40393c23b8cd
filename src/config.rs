use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub search: SearchConfig,

    pub filters: FiltersConfig,

    pub images: ImagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// 0 lets the runtime pick.
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Interface language passed to the news search (`hl`).
    pub language: String,

    /// Region passed to the news search (`gl`).
    pub region: String,

    pub base_url: String,

    pub timeout_secs: u64,

    pub user_agent: String,

    /// Lookback window applied when the request does not specify `dias`.
    pub default_days: i64,

    /// Result pages requested when the request does not specify `paginas`.
    pub default_pages: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            language: "pt-BR".to_string(),
            region: "BR".to_string(),
            base_url: "https://www.google.com/search".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (compatible; Manchete/0.1)".to_string(),
            default_days: 7,
            default_pages: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    /// Trusted source domains. Leave empty to disable the allow-list.
    pub allowed_domains: Vec<String>,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            allowed_domains: [
                "g1.globo.com",
                "oglobo.globo.com",
                "valor.globo.com",
                "uol.com.br",
                "folha.uol.com.br",
                "estadao.com.br",
                "cnnbrasil.com.br",
                "infomoney.com.br",
                "exame.com",
                "terra.com.br",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Per-article fetch budget; one slow page only stalls its own record.
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    pub fn create_default_if_missing() -> Result<()> {
        let path = Self::default_config_path();
        if path.exists() {
            info!("Config already exists at: {}", path.display());
            return Ok(());
        }
        Self::default().save_to_path(&path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        if self.search.base_url.is_empty() {
            anyhow::bail!("Search base URL cannot be empty");
        }

        if !(1..=30).contains(&self.search.default_days) {
            anyhow::bail!("Default search window must be between 1 and 30 days");
        }

        if !(1..=10).contains(&self.search.default_pages) {
            anyhow::bail!("Default page count must be between 1 and 10");
        }

        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("manchete").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".manchete").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().expect("defaults must validate");
    }

    #[test]
    fn rejects_out_of_range_defaults() {
        let mut config = Config::default();
        config.search.default_days = 90;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.search.default_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [filters]
            allowed_domains = ["uol.com.br"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.filters.allowed_domains, vec!["uol.com.br"]);
        assert_eq!(config.search.default_days, 7);
        assert_eq!(config.images.timeout_secs, 5);
    }
}
