pub mod archive;
pub mod cleanup;
pub mod commands;
pub mod compiler;
pub mod download;
pub mod error;
pub mod http;
pub mod installer;
pub mod platform;
pub mod resolver;
pub mod runtime;

pub use error::NvgtError;
