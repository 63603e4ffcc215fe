//! Infrastructure - configuration
//!
//! - `config` - Application configuration (TOML loading, defaults)

pub mod config;

pub use config::Config;
