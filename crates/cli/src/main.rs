//! Command-line interface for the `toolgram` application.
//!
//! This crate serves as the main entry point for the executable, delegating
//! its core functionality to the `toolgram-app` crate.

fn main() -> anyhow::Result<()> {
    toolgram_app::run()
}
