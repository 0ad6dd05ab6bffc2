//! Category inference for skill candidates.
//!
//! Inference walks an ordered rule table; the first rule that returns a
//! category wins and anything unmatched becomes [`SkillCategory::Other`].

use crate::bash::BashCategory;
use crate::types::{OperationPattern, SkillCategory};

type Rule = fn(&OperationPattern) -> Option<SkillCategory>;

static RULES: &[Rule] = &[
    from_bash_category,
    from_test_command,
    from_repeated_edits,
    from_command_keywords,
];

/// Substrings that mark a command as running tests.
const TEST_TOOL_MARKERS: &[&str] = &["test", "vitest", "jest", "pytest", "cargo test"];

/// Keyword groups, checked in order within each command.
static COMMAND_KEYWORDS: &[(&[&str], SkillCategory)] = &[
    (&["lint", "biome check"], SkillCategory::Lint),
    (&["git ", "gh "], SkillCategory::Git),
    (&["build", "tsc"], SkillCategory::Build),
];

const REFACTORING_EDIT_COUNT: usize = 3;

/// Infer the workflow category of a pattern.
pub fn infer_skill_category(pattern: &OperationPattern) -> SkillCategory {
    RULES
        .iter()
        .find_map(|rule| rule(pattern))
        .unwrap_or(SkillCategory::Other)
}

fn from_bash_category(pattern: &OperationPattern) -> Option<SkillCategory> {
    match pattern.category? {
        BashCategory::Test if read_before_edit(pattern) && has_test_command(pattern) => {
            Some(SkillCategory::Tdd)
        }
        BashCategory::Test => Some(SkillCategory::Test),
        BashCategory::Lint | BashCategory::Format => Some(SkillCategory::Lint),
        BashCategory::Build | BashCategory::Typecheck => Some(SkillCategory::Build),
        BashCategory::Git => Some(SkillCategory::Git),
        BashCategory::Install | BashCategory::Run | BashCategory::Other => None,
    }
}

fn from_test_command(pattern: &OperationPattern) -> Option<SkillCategory> {
    has_test_command(pattern).then_some(SkillCategory::Test)
}

fn from_repeated_edits(pattern: &OperationPattern) -> Option<SkillCategory> {
    let edits = pattern.sequence.iter().filter(|t| *t == "Edit").count();
    (edits >= REFACTORING_EDIT_COUNT).then_some(SkillCategory::Refactoring)
}

fn from_command_keywords(pattern: &OperationPattern) -> Option<SkillCategory> {
    pattern.common_commands.iter().find_map(|cmd| {
        let cmd = cmd.to_lowercase();
        COMMAND_KEYWORDS
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| cmd.contains(k)))
            .map(|(_, category)| *category)
    })
}

fn has_test_command(pattern: &OperationPattern) -> bool {
    pattern.common_commands.iter().any(|cmd| {
        let cmd = cmd.to_lowercase();
        TEST_TOOL_MARKERS.iter().any(|m| cmd.contains(m))
    })
}

/// True when the first `Read` comes before the first `Edit`.
fn read_before_edit(pattern: &OperationPattern) -> bool {
    let position = |tool: &str| pattern.sequence.iter().position(|t| t == tool);
    matches!(
        (position("Read"), position("Edit")),
        (Some(read), Some(edit)) if read < edit
    )
}

/// Conditions under which a skill of `category` should be offered.
pub fn trigger_conditions(category: SkillCategory) -> Vec<String> {
    let conditions: &[&str] = match category {
        SkillCategory::Tdd => &["After editing source files", "Before committing changes"],
        SkillCategory::Refactoring => &["When refactoring code across multiple files"],
        SkillCategory::Build => &["Before deployment", "After dependency changes"],
        SkillCategory::Git => &["When managing version control"],
        SkillCategory::Lint => &["Before committing changes", "During code review"],
        SkillCategory::Test => &["After code changes", "Before merging"],
        SkillCategory::Debugging | SkillCategory::Docs | SkillCategory::Other => {
            &["Manual invocation"]
        }
    };
    conditions.iter().map(|c| c.to_string()).collect()
}

/// Lead sentence of a skill description.
pub fn category_description(category: SkillCategory) -> &'static str {
    match category {
        SkillCategory::Tdd => "Test-driven development workflow",
        SkillCategory::Refactoring => "Code refactoring workflow",
        SkillCategory::Debugging => "Debugging workflow",
        SkillCategory::Build => "Build and compilation workflow",
        SkillCategory::Git => "Git operations workflow",
        SkillCategory::Lint => "Code linting and formatting workflow",
        SkillCategory::Test => "Test execution workflow",
        SkillCategory::Docs => "Documentation workflow",
        SkillCategory::Other => "Automated workflow",
    }
}
