pub mod bootstrap_config;
pub mod sources;
pub mod validation;

pub use bootstrap_config::*;
pub use sources::*;
pub use validation::*;
