// userbridge - identity-provider user export converter
// Copyright (c) 2025 Userbridge Contributors
// Licensed under the MIT License

use clap::Parser;
use std::process;
use userbridge::cli::{Cli, Commands};
use userbridge::config::{load_config_or_default, LoggingConfig};
use userbridge::logging::init_logging;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        process::exit(0);
    };

    // Logging settings come from the configuration when it loads; commands
    // report a broken configuration themselves.
    let config = load_config_or_default(cli.config.as_deref()).ok();
    let logging_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(LoggingConfig::default);
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let _guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "userbridge");

    let exit_code = match execute_command(&cli, command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    drop(_guard);
    process::exit(exit_code);
}

async fn execute_command(cli: &Cli, command: &Commands) -> anyhow::Result<i32> {
    match command {
        Commands::Run(args) => args.execute(cli.config.as_deref()).await,
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref()).await,
        Commands::Init(args) => args.execute().await,
    }
}
