//! Service registry: the mutable builder filled during bootstrap and the
//! read-only container it compiles into.

#[allow(clippy::module_inception)]
pub mod container;
pub mod builder;
pub mod definition;
pub mod resource;

pub use container::{Container, ContainerDump};
pub use builder::ContainerBuilder;
pub use definition::{reference, Definition, Entry, MethodCall, Reference, Tag};
pub use resource::Resource;
