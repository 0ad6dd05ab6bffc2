//! Manages toolgram configuration.
//!
//! This crate provides utilities for:
//! - Reading environment variables for configuration.
//! - Loading the optional `toolgram.json` settings file.
//! - Resolving analysis options across CLI flags, env vars, settings, and defaults.

pub mod config;
pub mod env;

pub use config::{
    AnalysisConfig, ConfigOverrides, DEFAULT_DAYS, DEFAULT_MAX_LENGTH, DEFAULT_MIN_FREQUENCY,
    DEFAULT_MIN_LENGTH,
};
pub use env::{
    default_projects_dir, env_days, env_max_length, env_min_frequency, env_projects_dir,
    exclude_tools_from_env, home_dir, load_settings, settings_file, Settings,
};
