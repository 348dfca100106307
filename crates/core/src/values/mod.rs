//! Values returned by the REST server layer.

pub mod created_version;

pub use created_version::CreatedVersion;
