//! Loading of YAML configuration documents into a [`ContainerBuilder`](crate::container::ContainerBuilder).

pub mod locator;
pub mod yaml;

pub use locator::FileLocator;
pub use yaml::YamlFileLoader;
