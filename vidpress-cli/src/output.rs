// vidpress-cli/src/output.rs
//
// Console output helpers. Color is applied when stdout is not redirected
// and NO_COLOR is unset.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check if color should be used (respects NO_COLOR environment variable)
fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a section header for a summary block
pub fn print_section(title: &str) {
    if use_color() {
        println!("\n{}", format!("===== {title} =====").cyan().bold());
    } else {
        println!("\n===== {title} =====");
    }
}

/// Print a `label: value` line with the label emphasized
pub fn print_info<T: Display>(label: &str, value: T) {
    if use_color() {
        println!("{} {}", format!("{label}:").bold(), value);
    } else {
        println!("{label}: {value}");
    }
}

pub fn print_success(msg: &str) {
    if use_color() {
        println!("{}", msg.green());
    } else {
        println!("{msg}");
    }
}

pub fn print_warning(msg: &str) {
    if use_color() {
        println!("{}", msg.yellow());
    } else {
        println!("{msg}");
    }
}

/// Print a failure line to stderr
pub fn print_error(msg: &str) {
    if use_color() {
        eprintln!("{}", msg.red().bold());
    } else {
        eprintln!("{msg}");
    }
}
