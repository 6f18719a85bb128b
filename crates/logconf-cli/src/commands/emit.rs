//! Configure logging for this process and emit sample events.

use anyhow::Result;
use logconf_core::{Logger, ModeLogger};
use std::io;
use crate::cli::Cli;

const TARGET: &str = "logconf::emit";

pub fn execute(cli: &Cli, count: usize) -> Result<()> {
    let env = cli.environment()?;
    let config = cli.host_config()?;
    let explicit = cli.explicit_properties()?;

    logconf_core::log::configure_with(&env, &config, &explicit)?;

    let logger = ModeLogger::new(Logger::new(TARGET));
    for round in 1..=count {
        tracing::info!(target: TARGET, round, "sample event through tracing");
        tracing::debug!(target: TARGET, round, "verbose event through tracing");
        log::warn!(target: TARGET, "sample record through the log facade (round {})", round);
        logger.info(format_args!("sample record through the logconf facade (round {})", round));
        logger.debug("debug record, hidden in test mode");

        let cause = io::Error::new(io::ErrorKind::Other, "simulated disk failure");
        logger.error_with_cause("sample failure", &cause);
    }

    logconf_core::log::shutdown();
    Ok(())
}
