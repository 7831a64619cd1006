//! `chanlog resolve`: name validation plus the configured emit settings.

use crate::config::Config;
use crate::router::validate_channel;
use std::process::ExitCode;

/// Handles `chanlog resolve <channel>...`. Fails when any name is invalid.
#[must_use]
pub fn cmd_resolve(channels: &[String], config: &Config) -> ExitCode {
    let filter = match config.filter() {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Invalid [channels] config: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut ok = true;
    for name in channels {
        if let Err(e) = validate_channel(name) {
            println!("{name}: {e}");
            ok = false;
            continue;
        }
        let setting = filter.setting(name);
        println!(
            "{name}: {} (min level {})",
            if setting.enabled { "enabled" } else { "disabled" },
            setting.min_level
        );
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
