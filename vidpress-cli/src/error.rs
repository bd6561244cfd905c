// vidpress-cli/src/error.rs
//
// CLI results reuse the core error type directly; the CLI adds no error
// variants of its own.

pub type CliResult<T> = vidpress_core::CoreResult<T>;
