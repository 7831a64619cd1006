//! Usage:
//!   chanlog render [--format json|line|compact|boxed] [--config PATH]
//!   chanlog levels
//!   chanlog resolve <channel>... [--config PATH]

use chanlog::cli::commands::{cmd_levels, cmd_render, cmd_resolve};
use chanlog::cli::{Cli, Command};
use chanlog::config::Config;
use chanlog::internal;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };
    internal::init_with_config(&config);

    match cli.command {
        Command::Render { format } => {
            let kind = match format {
                Some(format) => format.into(),
                None => match config.render.default_kind() {
                    Ok(kind) => kind,
                    Err(e) => {
                        eprintln!("Invalid render.format: {e}");
                        return ExitCode::FAILURE;
                    }
                },
            };
            let renderer = config.render.build(kind);
            cmd_render(renderer.as_ref())
        }
        Command::Levels => cmd_levels(),
        Command::Resolve { channels } => cmd_resolve(&channels, &config),
    }
}
