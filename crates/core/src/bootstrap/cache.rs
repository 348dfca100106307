use crate::config::{BootstrapConfig, CachePool};
use crate::container::ContainerBuilder;
use serde_yaml::{Mapping, Value};

/// Service id of the cache pool driver
pub const CACHE_POOL_DRIVER: &str = "ezpublish.cache_pool.driver";

/// Redis cache driver implementations, chosen by serializer and compression flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedisDriver {
    IgbinaryLzf,
    Igbinary,
    SerializeLzf,
    Plain,
}

impl RedisDriver {
    pub fn select(igbinary: bool, lzf: bool) -> Self {
        match (igbinary, lzf) {
            (true, true) => RedisDriver::IgbinaryLzf,
            (true, false) => RedisDriver::Igbinary,
            (false, true) => RedisDriver::SerializeLzf,
            (false, false) => RedisDriver::Plain,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            RedisDriver::IgbinaryLzf => "eZ\\Bundle\\EzPublishCoreBundle\\Cache\\Driver\\Redis\\RedisIgbinaryLzf",
            RedisDriver::Igbinary => "eZ\\Bundle\\EzPublishCoreBundle\\Cache\\Driver\\Redis\\RedisIgbinary",
            RedisDriver::SerializeLzf => "eZ\\Bundle\\EzPublishCoreBundle\\Cache\\Driver\\Redis\\RedisSerializeLzf",
            RedisDriver::Plain => "Stash\\Driver\\Redis",
        }
    }
}

/// Driver options: `{servers: [{server: <host>}]}`
pub fn redis_options(server: &str) -> Value {
    let mut entry = Mapping::new();
    entry.insert(Value::from("server"), Value::from(server));

    let mut options = Mapping::new();
    options.insert(
        Value::from("servers"),
        Value::Sequence(vec![Value::Mapping(entry)]),
    );
    Value::Mapping(options)
}

/// Register the cache pool driver when a Redis pool is configured.
///
/// Returns the selected driver, or `None` when the configuration documents'
/// default driver applies.
pub fn register_cache_driver(container: &mut ContainerBuilder, config: &BootstrapConfig) -> Option<RedisDriver> {
    if config.cache_pool != CachePool::SingleRedis {
        tracing::debug!("Using default cache pool driver");
        return None;
    }

    let driver = RedisDriver::select(config.redis_igbinary, config.redis_lzf);
    container
        .register(CACHE_POOL_DRIVER, driver.class())
        .add_argument(redis_options(config.cache_server()));

    tracing::info!("Cache pool driver {} on {}", driver.class(), config.cache_server());
    Some(driver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_truth_table() {
        assert_eq!(RedisDriver::select(true, true), RedisDriver::IgbinaryLzf);
        assert_eq!(RedisDriver::select(true, false), RedisDriver::Igbinary);
        assert_eq!(RedisDriver::select(false, true), RedisDriver::SerializeLzf);
        assert_eq!(RedisDriver::select(false, false), RedisDriver::Plain);
    }

    #[test]
    fn test_redis_options_shape() {
        let expected: Value = serde_yaml::from_str("servers:\n    - server: 10.0.0.5\n").unwrap();
        assert_eq!(redis_options("10.0.0.5"), expected);
    }

    #[test]
    fn test_default_pool_registers_nothing() {
        let mut container = ContainerBuilder::new();
        assert_eq!(register_cache_driver(&mut container, &BootstrapConfig::new()), None);
        assert!(!container.contains(CACHE_POOL_DRIVER));
    }
}
