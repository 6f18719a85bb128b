//! Apply the configuration to a private backend and report its statuses.

use anyhow::{bail, Result};
use colored::Colorize;
use logconf_core::mode::ModeState;
use logconf_core::{LogBridge, LoggingController, TracingBackend};
use logconf_types::{Status, StatusLevel};
use std::sync::Arc;
use crate::cli::Cli;

pub fn execute(cli: &Cli, verbose: bool) -> Result<()> {
    let env = cli.environment()?;
    let config = cli.host_config()?;
    let explicit = cli.explicit_properties()?;

    let (backend, dispatch) = TracingBackend::new();
    let controller = LoggingController::new(Arc::new(backend), Arc::new(LogBridge::new()))
        .with_mode_state(Arc::new(ModeState::new()))
        .with_diagnostics(std::io::sink());

    let result = tracing::dispatcher::with_default(&dispatch, || {
        controller.configure_with(&env, &config, &explicit)
    });
    let statuses = controller.last_statuses();
    controller.shutdown();
    result?;

    if statuses.is_empty() {
        println!("{} no configuration found, nothing to check", "!".yellow().bold());
        return Ok(());
    }

    for status in statuses.iter().filter(|s| verbose || s.level > StatusLevel::Info) {
        print_status(status);
    }

    let errors = statuses.iter().filter(|s| s.level == StatusLevel::Error).count();
    let warnings = statuses.iter().filter(|s| s.level == StatusLevel::Warn).count();
    if errors > 0 {
        bail!("configuration has {} error(s) and {} warning(s)", errors, warnings);
    }

    println!(
        "{} configuration is valid ({} warning(s))",
        "✓".green().bold(),
        warnings
    );
    Ok(())
}

fn print_status(status: &Status) {
    let label = match status.level {
        StatusLevel::Info => "INFO ".blue(),
        StatusLevel::Warn => "WARN ".yellow().bold(),
        StatusLevel::Error => "ERROR".red().bold(),
    };
    println!("  {} [{}] {}", label, status.origin, status.message);
}
