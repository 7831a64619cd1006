//! CLI module for chanlog.
//!
//! This module provides the command-line interface using Clap.

pub mod commands;
mod wire;

pub use wire::{WireRecord, parse_record};

use crate::render::RendererKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Renderer choice for CLI arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum FormatArg {
    Json,
    Line,
    Compact,
    Boxed,
}

impl From<FormatArg> for RendererKind {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => Self::Json,
            FormatArg::Line => Self::Line,
            FormatArg::Compact => Self::Compact,
            FormatArg::Boxed => Self::Boxed,
        }
    }
}

/// chanlog - Render structured log records.
#[derive(Parser)]
#[command(name = "chanlog", version, about = "Render structured log records")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Render JSONL records from stdin.
    Render {
        /// Renderer (defaults to `render.format` from the config)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// List severities and their weights.
    Levels,
    /// Check channel names and show their effective emit settings.
    Resolve {
        /// Channel names
        #[arg(required = true)]
        channels: Vec<String>,
    },
}
