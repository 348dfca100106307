pub mod assemble;
pub mod config;
pub mod documents;
pub mod passes;
