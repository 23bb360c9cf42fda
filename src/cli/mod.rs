//! Command Line Interface (CLI) layer for stereoscale.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`). It resolves presets and flags into
//! `RescaleParams` and hands off to `stereoscale::api`.
//!
//! If you are embedding stereoscale into another application, prefer using
//! the high-level `stereoscale::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
