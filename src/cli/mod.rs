//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for userbridge using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// userbridge - identity-provider user export converter
#[derive(Parser, Debug)]
#[command(name = "userbridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, env = "USERBRIDGE_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "USERBRIDGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute; without one nothing is done
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert every user export in an input directory
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
