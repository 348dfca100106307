use crate::config::{ConfigError, ConfigSource};
use std::collections::HashMap;
use std::env;

pub const CUSTOM_CACHE_POOL: &str = "CUSTOM_CACHE_POOL";
pub const REDIS_ENABLE_IGBINARY: &str = "REDIS_ENABLE_IGBINARY";
pub const REDIS_ENABLE_LZF: &str = "REDIS_ENABLE_LZF";
pub const CACHE_HOST: &str = "CACHE_HOST";

/// Server used when `CACHE_HOST` is absent, empty or `"0"`
pub const DEFAULT_CACHE_HOST: &str = "127.0.0.1";

/// Configuration trait for values resolved once at process start
pub trait BootstrapConfigTrait: Sized {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>;

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError>;

    /// Get configuration source information for debugging
    fn config_sources(&self) -> HashMap<String, ConfigSource>;
}

/// Cache pool family selected by `CUSTOM_CACHE_POOL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePool {
    /// Leave the driver to the configuration documents
    #[default]
    Default,
    /// A single Redis server
    SingleRedis,
}

impl CachePool {
    /// Only the exact value `singleredis` selects Redis; anything else keeps the default
    pub fn from_env_value(value: &str) -> Self {
        match value {
            "singleredis" => CachePool::SingleRedis,
            _ => CachePool::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CachePool::Default => "default",
            CachePool::SingleRedis => "singleredis",
        }
    }
}

impl std::fmt::Display for CachePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Environment-derived settings the container assembler needs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BootstrapConfig {
    pub cache_pool: CachePool,
    pub redis_igbinary: bool,
    pub redis_lzf: bool,
    pub cache_host: Option<String>,
    sources: HashMap<String, ConfigSource>,
}

impl BootstrapConfig {
    /// Configuration selecting the default cache pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration selecting a single Redis server
    pub fn single_redis(igbinary: bool, lzf: bool) -> Self {
        Self {
            cache_pool: CachePool::SingleRedis,
            redis_igbinary: igbinary,
            redis_lzf: lzf,
            ..Self::default()
        }
    }

    pub fn with_cache_host(mut self, host: impl Into<String>) -> Self {
        self.cache_host = Some(host.into());
        self
    }

    /// Resolve the configuration from an explicit variable snapshot
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        let mut config = Self::default();

        let mut record = |field: &str, var: &str, present: bool, default: &str| {
            let source = if present {
                ConfigSource::EnvVar(var.to_string())
            } else {
                ConfigSource::Default(default.to_string())
            };
            config.sources.insert(field.to_string(), source);
        };

        let pool = vars.get(CUSTOM_CACHE_POOL).map(|value| CachePool::from_env_value(value));
        record("cache_pool", CUSTOM_CACHE_POOL, pool.is_some(), CachePool::Default.as_str());

        let igbinary = vars.get(REDIS_ENABLE_IGBINARY).map(|value| is_truthy(value));
        record("redis_igbinary", REDIS_ENABLE_IGBINARY, igbinary.is_some(), "false");

        let lzf = vars.get(REDIS_ENABLE_LZF).map(|value| is_truthy(value));
        record("redis_lzf", REDIS_ENABLE_LZF, lzf.is_some(), "false");

        let host = vars.get(CACHE_HOST).filter(|host| is_truthy(host)).cloned();
        record("cache_host", CACHE_HOST, host.is_some(), DEFAULT_CACHE_HOST);

        config.cache_pool = pool.unwrap_or_default();
        config.redis_igbinary = igbinary.unwrap_or(false);
        config.redis_lzf = lzf.unwrap_or(false);
        config.cache_host = host;
        config
    }

    /// The cache server, falling back to the loopback address
    pub fn cache_server(&self) -> &str {
        self.cache_host
            .as_deref()
            .filter(|host| is_truthy(host))
            .unwrap_or(DEFAULT_CACHE_HOST)
    }
}

impl BootstrapConfigTrait for BootstrapConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let vars = env::vars_os().filter_map(|(key, value)| {
            let key = key.into_string().ok()?;
            Some((key, value.to_string_lossy().into_owned()))
        });
        let config = Self::from_vars(vars);
        tracing::debug!("Resolved bootstrap configuration: cache pool {}", config.cache_pool);
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(host) = &self.cache_host {
            if host.chars().any(char::is_whitespace) {
                return Err(ConfigError::invalid_value("cache_host", host.as_str(), "a host name without whitespace"));
            }
        }
        Ok(())
    }

    fn config_sources(&self) -> HashMap<String, ConfigSource> {
        let mut sources = self.sources.clone();
        for field in ["cache_pool", "redis_igbinary", "redis_lzf", "cache_host"] {
            sources
                .entry(field.to_string())
                .or_insert(ConfigSource::Programmatic);
        }
        sources
    }
}

/// Environment flags are off when absent, empty or `"0"`
pub fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}
