use crate::level::Level;
use std::process::ExitCode;

/// Handles `chanlog levels`.
#[must_use]
pub fn cmd_levels() -> ExitCode {
    for level in Level::all() {
        println!("{:<10} {:>3}", level.as_str(), level.weight());
    }
    ExitCode::SUCCESS
}
