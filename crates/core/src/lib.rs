pub mod bootstrap;
pub mod compiler;
pub mod config;
pub mod container;
pub mod errors;
pub mod loader;
pub mod values;

// Re-export key types for convenience
pub use bootstrap::{assemble, ContainerAssembler, CONFIGURATION_DOCUMENTS, ROOT_DIR_PARAMETER};
pub use compiler::{kernel_passes, CompilerPass};
pub use config::{BootstrapConfig, BootstrapConfigTrait, CachePool, ConfigError, ConfigSource};
pub use container::{Container, ContainerBuilder, Definition, Entry, Resource, Tag};
pub use errors::CoreError;
pub use values::CreatedVersion;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get kernel version
pub fn version() -> &'static str {
    VERSION
}
