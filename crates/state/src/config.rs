//! Resolution of analysis options from CLI flags, environment, and settings.
//!
//! Each value is taken from the first source that provides it, in the order
//! CLI flag, environment variable, settings file, built-in default.

use crate::env::{
    default_projects_dir, env_days, env_max_length, env_min_frequency, env_projects_dir,
    exclude_tools_from_env, Settings,
};
use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_MIN_FREQUENCY: usize = 2;
pub const DEFAULT_MAX_LENGTH: usize = 5;
pub const DEFAULT_MIN_LENGTH: usize = 2;

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub projects_dir: Option<PathBuf>,
    pub days: Option<u32>,
    pub min_frequency: Option<usize>,
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub exclude_tools: Vec<String>,
}

/// Fully resolved analysis configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub projects_dir: PathBuf,
    pub days: u32,
    pub min_frequency: usize,
    pub max_length: usize,
    pub min_length: usize,
    pub exclude_tools: Vec<String>,
}

impl AnalysisConfig {
    /// Resolve every option against the environment and `settings`.
    pub fn resolve(overrides: &ConfigOverrides, settings: &Settings) -> Result<Self> {
        let projects_dir = match overrides
            .projects_dir
            .clone()
            .or_else(env_projects_dir)
            .or_else(|| settings.projects_dir.clone())
        {
            Some(dir) => dir,
            None => default_projects_dir()?,
        };

        let exclude_tools = first_non_empty([
            overrides.exclude_tools.clone(),
            exclude_tools_from_env(),
            settings.exclude_tools.clone().unwrap_or_default(),
        ]);

        Ok(Self {
            projects_dir,
            days: overrides
                .days
                .or_else(env_days)
                .or(settings.days)
                .unwrap_or(DEFAULT_DAYS),
            min_frequency: overrides
                .min_frequency
                .or_else(env_min_frequency)
                .or(settings.min_frequency)
                .unwrap_or(DEFAULT_MIN_FREQUENCY),
            max_length: overrides
                .max_length
                .or_else(env_max_length)
                .or(settings.max_length)
                .unwrap_or(DEFAULT_MAX_LENGTH),
            min_length: overrides
                .min_length
                .or(settings.min_length)
                .unwrap_or(DEFAULT_MIN_LENGTH),
            exclude_tools,
        })
    }
}

fn first_non_empty<const N: usize>(candidates: [Vec<String>; N]) -> Vec<String> {
    candidates
        .into_iter()
        .find(|c| !c.is_empty())
        .unwrap_or_default()
}
