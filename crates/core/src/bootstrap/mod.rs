//! Container bootstrap: turns an install directory and a resolved
//! [`BootstrapConfig`](crate::config::BootstrapConfig) into an assembled
//! [`ContainerBuilder`](crate::container::ContainerBuilder).

pub mod assembler;
pub mod cache;

pub use assembler::*;
pub use cache::*;
