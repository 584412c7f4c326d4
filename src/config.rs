use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Defaults shipped with the app; used for keys missing from `.env` and the environment.
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 3000;
/// Single authoritative upload limit (5 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5_000_000;
pub const DEFAULT_TITLE_LENGTH: usize = 20;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_HISTORY_LIMIT: u32 = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub request_timeout: Duration,
    pub max_upload_bytes: u64,
    pub title_length: usize,
    pub max_tokens: u32,
    pub history_limit: u32,
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            title_length: DEFAULT_TITLE_LENGTH,
            max_tokens: DEFAULT_MAX_TOKENS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            download_dir: None,
        }
    }
}

impl ClientConfig {
    /// Loads `.env` (desktop dev), then reads the process environment with the
    /// bundled config as fallback.
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded {}", path.display());
        }

        let bundled = parse_env_file(BUNDLED_CONFIG);
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| bundled.get(key).cloned())
        })
    }

    /// Builds a config from any key lookup; missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup("DRQA_API_BASE").filter(|v| !v.trim().is_empty()) {
            config.api_base = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = parse_key::<u64>(&lookup, "DRQA_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = parse_key::<u64>(&lookup, "DRQA_MAX_UPLOAD_BYTES")? {
            config.max_upload_bytes = bytes;
        }
        if let Some(len) = parse_key::<usize>(&lookup, "DRQA_TITLE_LENGTH")? {
            if len == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "DRQA_TITLE_LENGTH",
                    value: len.to_string(),
                });
            }
            config.title_length = len;
        }
        if let Some(tokens) = parse_key::<u32>(&lookup, "DRQA_MAX_TOKENS")? {
            config.max_tokens = tokens;
        }
        if let Some(limit) = parse_key::<u32>(&lookup, "DRQA_HISTORY_LIMIT")? {
            config.history_limit = limit;
        }
        if let Some(dir) = lookup("DRQA_DOWNLOAD_DIR").filter(|v| !v.trim().is_empty()) {
            config.download_dir = Some(PathBuf::from(dir.trim()));
        }

        Ok(config)
    }

    /// Where downloaded documents and conversation exports are written.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("downloads"))
    }
}

fn parse_key<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        _ => Ok(None),
    }
}

fn parse_env_file(contents: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    values
}
