//! Melody CLI library
//!
//! Configuration loading and display helpers for the `melody` binary.

pub mod config;
pub mod error;
pub mod format;

pub use config::AppConfig;
pub use error::{CliError, Result};
