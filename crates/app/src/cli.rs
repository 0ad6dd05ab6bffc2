use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use toolgram_state::ConfigOverrides;

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable plain text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// Markdown report.
    Markdown,
}

/// Command-line interface for the `toolgram` application.
#[derive(Debug, Parser)]
#[command(
    name = "toolgram",
    version,
    about = "Tool-call pattern analytics for Claude Code session logs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Pattern mining knobs shared by `analyze` and `patterns`.
#[derive(Debug, Clone, Default, Args)]
pub struct DetectionArgs {
    /// Minimum number of occurrences for a pattern (overrides `TOOLGRAM_MIN_FREQUENCY`).
    #[arg(long, value_name = "N")]
    pub min_frequency: Option<usize>,
    /// Maximum pattern length in tool calls (overrides `TOOLGRAM_MAX_LENGTH`).
    #[arg(long, value_name = "N")]
    pub max_length: Option<usize>,
    /// Minimum pattern length in tool calls.
    #[arg(long, value_name = "N")]
    pub min_length: Option<usize>,
    /// Tool names to ignore while mining (repeatable; overrides `TOOLGRAM_EXCLUDE_TOOLS`).
    #[arg(long = "exclude-tool", value_name = "NAME")]
    pub exclude_tools: Vec<String>,
}

impl DetectionArgs {
    /// Combine mining flags with the session-selection flags into config overrides.
    pub fn overrides(&self, days: Option<u32>, projects_dir: Option<PathBuf>) -> ConfigOverrides {
        ConfigOverrides {
            projects_dir,
            days,
            min_frequency: self.min_frequency,
            max_length: self.max_length,
            min_length: self.min_length,
            exclude_tools: self.exclude_tools.clone(),
        }
    }
}

/// Available `toolgram` commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyzes recent sessions: efficiency, patterns, and skill candidates.
    Analyze {
        /// Analyze a single session by ID instead of a time window.
        #[arg(short, long, value_name = "ID")]
        session: Option<String>,
        /// Number of days to look back (overrides `TOOLGRAM_DAYS`, default 7).
        #[arg(short, long, value_name = "N")]
        days: Option<u32>,
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Include per-session details and debug logging.
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
        /// Skip pattern detection.
        #[arg(long, default_value_t = false)]
        no_patterns: bool,
        #[command(flatten)]
        detection: DetectionArgs,
        /// Claude projects directory (overrides `TOOLGRAM_PROJECTS_DIR`).
        #[arg(long, value_name = "DIR")]
        projects_dir: Option<PathBuf>,
    },
    /// Lists session transcripts found in the look-back window.
    Sessions {
        /// Number of days to look back (overrides `TOOLGRAM_DAYS`, default 7).
        #[arg(short, long, value_name = "N")]
        days: Option<u32>,
        /// Only list sessions of this project directory.
        #[arg(long, value_name = "NAME")]
        project: Option<String>,
        /// Output format: text or json.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Claude projects directory (overrides `TOOLGRAM_PROJECTS_DIR`).
        #[arg(long, value_name = "DIR")]
        projects_dir: Option<PathBuf>,
    },
    /// Mines tool-call patterns in one session and prints their statistics.
    Patterns {
        /// Session ID to mine.
        #[arg(short, long, value_name = "ID", required = true)]
        session: String,
        /// Also list where this comma-separated tool sequence occurs (e.g. `Read,Edit`).
        #[arg(long, value_name = "TOOLS", value_delimiter = ',')]
        find: Vec<String>,
        /// Output format: text or json.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[command(flatten)]
        detection: DetectionArgs,
        /// Claude projects directory (overrides `TOOLGRAM_PROJECTS_DIR`).
        #[arg(long, value_name = "DIR")]
        projects_dir: Option<PathBuf>,
    },
}

impl Commands {
    /// Whether the command asked for verbose output.
    pub fn is_verbose(&self) -> bool {
        matches!(self, Commands::Analyze { verbose: true, .. })
    }
}
