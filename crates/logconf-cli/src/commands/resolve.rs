//! Show the resolved configuration source and context properties.

use anyhow::Result;
use colored::Colorize;
use logconf_core::resolver::{self, SourceOverrides};
use logconf_core::{properties, ProcessSettings};
use logconf_types::Environment;
use crate::cli::Cli;

pub fn execute(cli: &Cli) -> Result<()> {
    let env = cli.environment()?;
    let config = cli.host_config()?;
    let explicit = cli.explicit_properties()?;

    let overrides = SourceOverrides::from_lookup(&ProcessSettings);
    let source = resolver::resolve(&env, &overrides)?;
    let props = properties::build(&env, &config, &explicit);

    println!("\n{}", "Logging Configuration".cyan().bold());
    println!("{}", "=".repeat(50));

    println!("\n{}:", "Environment".green().bold());
    println!("  Root: {}", env.root_path().display());
    println!("  Mode: {}", env.mode());

    println!("\n{}:", "Overrides".green().bold());
    if overrides.is_empty() {
        println!("  (none)");
    }
    if let Some(resource) = &overrides.resource {
        println!("  Resource: {}", resource);
    }
    if let Some(file) = &overrides.file {
        println!("  File: {}", file);
    }
    if let Some(url) = &overrides.url {
        println!("  URL: {}", url);
    }

    println!("\n{}:", "Source".green().bold());
    match &source {
        Some(url) => println!("  {}", url.as_str().cyan()),
        None => println!("  {}", "no configuration found".yellow()),
    }

    println!("\n{}:", "Properties".green().bold());
    for (key, value) in props.iter() {
        println!("  {}: {}", key, value);
    }

    Ok(())
}
