// vidpress-cli/src/lib.rs
//
// Library portion of the vidpress CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::{BatchArgs, ChaptersArgs, Cli, Commands, EncodeArgs, EncodeFlags, ScaleArgs, ValidateArgs};
