//! Classification of shell commands issued through the `Bash` tool.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static GIT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(git|gh)\s").expect("Invalid regex pattern"));
static TEST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(vitest|jest|mocha|pytest|cargo\s+test|cargo\s+nextest|go\s+test|(npm|pnpm|yarn|bun)\s+(run\s+)?test)\b",
    )
    .expect("Invalid regex pattern")
});
static TYPECHECK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\btsc\b.*--noEmit|\bvue-tsc\b|\bmypy\b|\bpyright\b|\bcargo\s+check\b|\btypecheck\b)")
        .expect("Invalid regex pattern")
});
static FORMAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(prettier|biome\s+format|ruff\s+format|cargo\s+fmt|rustfmt|gofmt|black|dprint)\b",
    )
    .expect("Invalid regex pattern")
});
static LINT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(eslint|biome\s+(check|lint)|rubocop|flake8|ruff|clippy|golangci-lint|lint)\b")
        .expect("Invalid regex pattern")
});
static BUILD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(tsc|webpack|vite\s+build|next\s+build|(npm|pnpm|yarn|bun)\s+(run\s+)?build|cargo\s+build|go\s+build|make|cmake)\b",
    )
    .expect("Invalid regex pattern")
});
static INSTALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b((npm|pnpm|yarn|bun)\s+(install|i|add)|pip3?\s+install|cargo\s+(add|install)|brew\s+install|apt(-get)?\s+install)\b",
    )
    .expect("Invalid regex pattern")
});
static RUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*((npm|pnpm|yarn|bun)\s+run|node|deno|python3?|cargo\s+run|go\s+run)\b")
        .expect("Invalid regex pattern")
});

/// Category of a shell command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BashCategory {
    Test,
    Lint,
    Format,
    Build,
    Git,
    Install,
    Typecheck,
    Run,
    Other,
}

impl BashCategory {
    /// Lower-case label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            BashCategory::Test => "test",
            BashCategory::Lint => "lint",
            BashCategory::Format => "format",
            BashCategory::Build => "build",
            BashCategory::Git => "git",
            BashCategory::Install => "install",
            BashCategory::Typecheck => "typecheck",
            BashCategory::Run => "run",
            BashCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for BashCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered so that the more specific categories win: `tsc --noEmit` is a
/// typecheck before it is a build, `ruff format` is formatting before lint.
static RULES: &[(&LazyLock<Regex>, BashCategory)] = &[
    (&GIT_PATTERN, BashCategory::Git),
    (&TEST_PATTERN, BashCategory::Test),
    (&TYPECHECK_PATTERN, BashCategory::Typecheck),
    (&FORMAT_PATTERN, BashCategory::Format),
    (&LINT_PATTERN, BashCategory::Lint),
    (&BUILD_PATTERN, BashCategory::Build),
    (&INSTALL_PATTERN, BashCategory::Install),
    (&RUN_PATTERN, BashCategory::Run),
];

/// Classify a shell command line.
pub fn classify_bash_command(command: &str) -> BashCategory {
    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(command))
        .map(|(_, category)| *category)
        .unwrap_or(BashCategory::Other)
}
