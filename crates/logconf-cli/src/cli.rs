//! CLI structure and command definitions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logconf_core::{AppEnvironment, Config};
use logconf_types::{Mode, PropertyBag};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logconf")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resolve, check and exercise logging configuration", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Application root directory
    #[arg(short, long, global = true, default_value = ".", env = "APPLICATION_HOME")]
    pub root: PathBuf,

    /// Application mode (dev, test, prod)
    #[arg(short, long, global = true, default_value = "prod")]
    pub mode: Mode,

    /// Host configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Extra context property, may be repeated
    #[arg(short = 'D', global = true, value_name = "KEY=VALUE", value_parser = parse_property)]
    pub property: Vec<(String, String)>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which configuration source would be used and the properties
    /// seeded into the backend
    Resolve,

    /// Apply the configuration against a private backend and report every
    /// status it records
    Check {
        /// Print informational statuses as well
        #[arg(short, long)]
        verbose: bool,
    },

    /// Configure logging for this process and emit sample events
    Emit {
        /// Number of sample rounds
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Show version information
    Version {
        /// Show detailed version info
        #[arg(short, long)]
        verbose: bool,
    },
}

impl Cli {
    pub fn execute(&self) -> Result<()> {
        use crate::commands::*;

        match &self.command {
            Commands::Resolve => resolve::execute(self),
            Commands::Check { verbose } => check::execute(self, *verbose),
            Commands::Emit { count } => emit::execute(self, *count),
            Commands::Version { verbose } => version::execute(*verbose),
        }
    }

    /// Environment described by `--root` and `--mode`.
    pub fn environment(&self) -> Result<AppEnvironment> {
        AppEnvironment::new(&self.root, self.mode)
            .with_context(|| format!("Invalid application root {:?}", self.root))
    }

    /// Host configuration from `--config`, or an empty one.
    pub fn host_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load host configuration {:?}", path)),
            None => Ok(Config::empty()),
        }
    }

    /// Properties given with `-D`.
    pub fn explicit_properties(&self) -> Result<PropertyBag> {
        let mut bag = PropertyBag::new();
        for (key, value) in &self.property {
            bag.insert(key, value.as_str())
                .with_context(|| format!("Invalid property name '{}'", key))?;
        }
        Ok(bag)
    }
}

fn parse_property(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("missing property name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("LOG_DIR=/var/log/app").unwrap(),
            ("LOG_DIR".to_string(), "/var/log/app".to_string())
        );
        assert_eq!(parse_property("EMPTY=").unwrap().1, "");
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=x").is_err());
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "logconf", "check", "--mode", "dev", "-D", "a=1", "-D", "b=2", "--root", "/srv/app",
        ])
        .unwrap();

        assert_eq!(cli.mode, Mode::Dev);
        assert_eq!(cli.root, PathBuf::from("/srv/app"));
        let bag = cli.explicit_properties().unwrap();
        assert_eq!(bag.get("a"), Some("1"));
        assert_eq!(bag.get("b"), Some("2"));
        assert!(matches!(cli.command, Commands::Check { verbose: false }));
    }

    #[test]
    fn test_bad_mode_rejected() {
        assert!(Cli::try_parse_from(["logconf", "resolve", "--mode", "staging"]).is_err());
    }

    #[test]
    fn test_invalid_property_name() {
        let cli = Cli::try_parse_from(["logconf", "resolve", "-D", "bad key=1"]).unwrap();
        assert!(cli.explicit_properties().is_err());
    }
}
