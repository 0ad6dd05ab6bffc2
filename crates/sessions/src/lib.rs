//! Session transcript source for toolgram.
//!
//! Finds Claude Code JSONL transcripts under `~/.claude/projects/`, parses
//! tool calls and tool results out of them, and turns each transcript into
//! a [`toolgram_patterns::SessionInput`] ready for analysis.

#![deny(unsafe_code)]

pub mod error;
pub mod listing;
pub mod metrics;
pub mod parser;

pub use error::SessionError;
pub use listing::{find_session, list_sessions, list_sessions_in_period, SessionInfo};
pub use metrics::{calculate_session_metrics, load_session_inputs};
pub use parser::{parse_session, parse_session_content, ParsedSession};
