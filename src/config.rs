use crate::domain::constants::{
    DEFAULT_API_URL, DEFAULT_TIMEOUT_MS, EVICT_AFTER_SECS, STALE_AFTER_SECS,
};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub const API_URL_ENV: &str = "CAFES_API_URL";

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api_url: Option<String>,
    timeout_ms: Option<u64>,
    stale_after_secs: Option<u64>,
    evict_after_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub timeout_ms: u64,
    pub stale_after_secs: u64,
    pub evict_after_secs: u64,
}

fn config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".config/cafes/config.toml"))
}

fn load_file() -> anyhow::Result<ConfigFile> {
    let Ok(path) = config_path() else {
        warn!("HOME not set, using default configuration");
        return Ok(ConfigFile::default());
    };
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    debug!(path = %path.display(), "reading config file");
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

impl Config {
    /// File, then `CAFES_API_URL`, then the `--api-url` flag; later wins.
    pub fn load(api_url_flag: Option<&str>) -> anyhow::Result<Self> {
        let file = load_file()?;
        let env_url = std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty());
        Ok(Self::resolve(file, env_url, api_url_flag.map(str::to_string)))
    }

    fn resolve(file: ConfigFile, env_url: Option<String>, flag_url: Option<String>) -> Self {
        let api_url = flag_url.or(env_url).or(file.api_url).unwrap_or_else(|| {
            info!("{API_URL_ENV} not set, using default: {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        let stale_after_secs = file.stale_after_secs.unwrap_or(STALE_AFTER_SECS);
        let mut evict_after_secs = file.evict_after_secs.unwrap_or(EVICT_AFTER_SECS);
        if evict_after_secs < stale_after_secs {
            warn!(
                stale_after_secs,
                evict_after_secs, "eviction window shorter than freshness window, raising it"
            );
            evict_after_secs = stale_after_secs;
        }
        Self {
            api_url,
            timeout_ms: file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
            stale_after_secs,
            evict_after_secs,
        }
    }
}
