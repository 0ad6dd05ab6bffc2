//! Rendering of [`AggregatedAnalysis`] reports.
//!
//! Every renderer returns the complete report as a `String`; printing is
//! left to the command handlers.

mod markdown;
mod text;

pub use markdown::render_markdown;
pub use text::render_text;

use crate::cli::OutputFormat;
use anyhow::Result;
use toolgram_patterns::AggregatedAnalysis;

/// Presentation switches for the text report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Include per-session details.
    pub verbose: bool,
    /// Show the detected patterns section.
    pub include_patterns: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            include_patterns: true,
        }
    }
}

/// Render `analysis` in the requested format.
pub fn render_report(
    analysis: &AggregatedAnalysis,
    format: OutputFormat,
    options: ReportOptions,
) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(analysis, options),
        OutputFormat::Markdown => render_markdown(analysis),
        OutputFormat::Json => serde_json::to_string_pretty(analysis)?,
    })
}

/// Formats a 0..1 ratio as a percentage with one decimal.
pub(crate) fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Calendar date part of an RFC 3339 timestamp, `-` when absent.
pub(crate) fn date_part(timestamp: Option<&str>) -> &str {
    match timestamp {
        Some(ts) => ts.get(..10).unwrap_or(ts),
        None => "-",
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_analysis;
    use super::*;

    #[test]
    fn test_date_part() {
        assert_eq!(date_part(Some("2025-01-18T10:00:00Z")), "2025-01-18");
        assert_eq!(date_part(Some("2025")), "2025");
        assert_eq!(date_part(None), "-");
    }

    #[test]
    fn test_percent_uses_one_decimal() {
        assert_eq!(percent(0.3), "30.0%");
        assert_eq!(percent(0.0), "0.0%");
        assert_eq!(percent(1.0 / 18.0), "5.6%");
    }

    #[test]
    fn test_json_report_is_camel_case() {
        let analysis = sample_analysis();
        let json =
            render_report(&analysis, OutputFormat::Json, ReportOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["analyzedPeriod"]["totalSessions"], 2);
        assert_eq!(value["summary"]["totalToolCalls"], 18);
        assert!(value["skillCandidates"].is_array());
    }
}
