use kernel_core::{BootstrapConfig, BootstrapConfigTrait};

pub fn run() -> anyhow::Result<()> {
    let config = BootstrapConfig::from_env()?;
    let sources = config.config_sources();
    let source = |field: &str| sources.get(field).map(ToString::to_string).unwrap_or_default();

    println!("Bootstrap configuration:");
    println!("   cache_pool:     {:<12} ({})", config.cache_pool.as_str(), source("cache_pool"));
    println!("   redis_igbinary: {:<12} ({})", config.redis_igbinary, source("redis_igbinary"));
    println!("   redis_lzf:      {:<12} ({})", config.redis_lzf, source("redis_lzf"));
    println!("   cache_host:     {:<12} ({})", config.cache_server(), source("cache_host"));

    if let Err(e) = config.validate() {
        println!("⚠️ {}", e);
    }
    Ok(())
}
