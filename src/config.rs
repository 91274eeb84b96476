use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub styles: StylesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// The violations dataset. A fixed deployment artifact; failure to read
    /// it aborts startup.
    pub data_csv: PathBuf,
    /// Local India state boundaries. Optional at runtime: absence degrades
    /// the India map with a warning.
    pub india_geojson: PathBuf,
    /// Public world boundaries, fetched once per cache window.
    pub world_geojson_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Seconds a fetched/parsed geojson pair stays valid.
    #[serde(default = "default_geojson_ttl")]
    pub geojson_ttl_secs: u64,
    /// Upper bound on the world-geojson fetch so an unreachable host cannot
    /// stall a render indefinitely.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StylesConfig {
    /// Extra CSS appended to the built-in stylesheet when readable; skipped
    /// silently otherwise.
    pub override_css: Option<PathBuf>,
}

fn default_geojson_ttl() -> u64 {
    3600
}

fn default_fetch_timeout() -> u64 {
    15
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            geojson_ttl_secs: default_geojson_ttl(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}
