use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging to stderr; `RUST_LOG` takes precedence over `default_filter`
pub fn init(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(Layer::new().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
