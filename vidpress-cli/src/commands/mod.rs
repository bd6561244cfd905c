//! Command implementations for the CLI.
//!
//! Each submodule implements one subcommand and returns the process exit
//! code on success.

pub mod batch;
pub mod chapters;
pub mod encode;
pub mod scale;
pub mod validate;
