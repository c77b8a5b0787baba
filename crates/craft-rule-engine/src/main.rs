//! 飞行器规则校验命令行入口

mod cli;

use clap::Parser;
use cli::{Cli, CommandRunner};
use craft_shared::config::AppConfig;
use craft_shared::observability::{self, ObservabilityGuard};
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = AppConfig::load("craft-validate").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let mut obs_config = config.observability.clone();
    if let Some(level) = &cli.log_level {
        obs_config = obs_config.with_log_level(level);
    }
    let _guard = observability::init(&obs_config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {}", e);
        ObservabilityGuard::empty()
    });

    let runner = CommandRunner::new(config.engine.clone());
    match runner.run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
