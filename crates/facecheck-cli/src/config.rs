use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Client configuration.
///
/// Resolved from defaults, then an optional TOML file, then `FACECHECK_*`
/// environment variables, then command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the backend REST API.
    pub host_url: String,
    /// Base URL of the face model host.
    pub model_url: String,
    /// Bearer token passed through to the backend.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Default page size for customer and task listings.
    pub page_size: u32,
}

/// On-disk configuration. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host_url: Option<String>,
    pub model_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub page_size: Option<u32>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }
}

impl Config {
    /// Load configuration from the config file (if any) and the process
    /// environment.
    pub fn load() -> Result<Self> {
        let file = match std::env::var("FACECHECK_CONFIG") {
            // An explicitly named file must exist.
            Ok(path) => FileConfig::read(Path::new(&path))?,
            Err(_) => match default_config_path() {
                Some(path) if path.exists() => FileConfig::read(&path)?,
                _ => FileConfig::default(),
            },
        };
        Ok(Self::resolve(file, |key| std::env::var(key).ok()))
    }

    /// Layer environment variables from `env` over `file` and defaults.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let token = env("FACECHECK_TOKEN")
            .or(file.token)
            .filter(|t| !t.is_empty());

        Self {
            host_url: env("FACECHECK_HOST_URL")
                .or(file.host_url)
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            model_url: env("FACECHECK_MODEL_URL")
                .or(file.model_url)
                .unwrap_or_else(|| "http://localhost:5000".to_string()),
            token,
            timeout_secs: env_parse(&env, "FACECHECK_TIMEOUT_SECS")
                .or(file.timeout_secs)
                .unwrap_or(30),
            page_size: env_parse(&env, "FACECHECK_PAGE_SIZE")
                .or(file.page_size)
                .unwrap_or(5),
        }
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

/// `$XDG_CONFIG_HOME/facecheck/config.toml`, falling back to `~/.config`.
fn default_config_path() -> Option<PathBuf> {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
        .ok()?;
    Some(config_dir.join("facecheck").join("config.toml"))
}

fn env_parse<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}
